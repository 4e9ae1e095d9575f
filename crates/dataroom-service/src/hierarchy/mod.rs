//! Read-only traversal of a snapshot.
//!
//! Every parent/child link is an id lookup into the snapshot arena, so
//! traversal never follows a reference cycle; the closure walk still keeps
//! a visited set in case remote data delivers one.

pub mod invariants;
pub mod model;
pub mod views;

pub use invariants::{InvariantViolation, verify_invariants};
pub use model::{Hierarchy, ItemId};
pub use views::{DescendantStats, FolderListing};
