//! # dataroom-cache
//!
//! Content cache providers for file payloads. Supports two modes:
//!
//! - **memory**: In-process cache using [moka](https://crates.io/crates/moka),
//!   bounded by total payload bytes
//! - **local**: One file per payload under a root directory, surviving
//!   process restarts
//!
//! The provider is selected at runtime based on configuration and wrapped
//! in a [`ContentCacheManager`], which also records delete tombstones.

pub mod keys;
pub mod local;
pub mod manager;
pub mod memory;

pub use local::LocalContentCache;
pub use manager::ContentCacheManager;
pub use memory::MemoryContentCache;
