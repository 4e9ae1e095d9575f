//! Core type definitions used across the data room workspace.

pub mod collection;
pub mod content;
pub mod id;
pub mod sorting;

pub use collection::Collection;
pub use content::{ContentOwner, ContentRef};
pub use id::*;
pub use sorting::{SortDirection, SortKey};
