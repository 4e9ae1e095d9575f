//! Remote feed configuration.

use serde::{Deserialize, Serialize};

/// Synchronization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Capacity of each per-collection feed channel.
    #[serde(default = "default_feed_buffer_size")]
    pub feed_buffer_size: usize,
    /// How long the CLI waits for the first delivery of every feed.
    #[serde(default = "default_initial_sync_timeout")]
    pub initial_sync_timeout_seconds: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            feed_buffer_size: default_feed_buffer_size(),
            initial_sync_timeout_seconds: default_initial_sync_timeout(),
        }
    }
}

fn default_feed_buffer_size() -> usize {
    64
}

fn default_initial_sync_timeout() -> u64 {
    10
}
