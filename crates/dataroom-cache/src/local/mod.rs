//! On-disk content cache.

pub mod store;

pub use store::LocalContentCache;
