//! # dataroom-core
//!
//! Core crate for the data room workspace. Contains the store traits,
//! configuration schemas, typed identifiers, feed and workspace events,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other data room crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
