//! In-memory content cache.

pub mod store;

pub use store::MemoryContentCache;
