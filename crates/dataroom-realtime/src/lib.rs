//! # dataroom-realtime
//!
//! In-process implementation of the remote metadata store. Provides:
//!
//! - Per-user document collections (rooms, folders, files) with
//!   last-write-wins point writes and JSON merge-patch updates
//! - Live per-collection feeds that deliver the whole collection after
//!   every change, starting with the current state on subscribe
//! - A per-user preference document
//! - Failure injection hooks for exercising partial-failure paths

pub mod bridge;
pub mod channel;
pub mod store;

pub use bridge::memory_pubsub::MemoryPubSub;
pub use channel::types::FeedChannel;
pub use store::memory::MemoryRemoteStore;
