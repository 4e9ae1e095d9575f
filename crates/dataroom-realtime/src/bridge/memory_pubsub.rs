//! In-memory pub/sub for feed deliveries.

use dashmap::DashMap;
use tokio::sync::broadcast;

use dataroom_core::events::FeedEvent;

/// In-memory pub/sub implementation.
///
/// Publishing is synchronous so a store can publish while it still holds
/// the lock on the collection it just changed, which keeps deliveries in
/// write order.
#[derive(Debug)]
pub struct MemoryPubSub {
    /// Channel name → broadcast sender
    channels: DashMap<String, broadcast::Sender<FeedEvent>>,
    /// Buffer size for channels
    buffer_size: usize,
}

impl MemoryPubSub {
    /// Create a new in-memory pub/sub
    pub fn new(buffer_size: usize) -> Self {
        Self {
            channels: DashMap::new(),
            buffer_size: buffer_size.max(1),
        }
    }

    /// Publish an event to a channel. Returns the number of receivers.
    pub fn publish(&self, channel: &str, event: FeedEvent) -> usize {
        self.channels
            .get(channel)
            .and_then(|tx| tx.send(event).ok())
            .unwrap_or(0)
    }

    /// Subscribe to a channel, returns a receiver
    pub fn subscribe(&self, channel: &str) -> broadcast::Receiver<FeedEvent> {
        self.channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(self.buffer_size).0)
            .subscribe()
    }

    /// Number of live receivers on a channel.
    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.channels
            .get(channel)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }
}
