//! Fan-out of feed deliveries to subscribers.

pub mod memory_pubsub;

pub use memory_pubsub::MemoryPubSub;
