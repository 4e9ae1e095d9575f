//! Remote metadata store implementations.

pub mod memory;
pub mod merge;

pub use memory::MemoryRemoteStore;
