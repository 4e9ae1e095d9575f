//! Remote collection feed deliveries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::types::Collection;

/// One delivery of a live collection feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedEvent {
    /// The full current state of a collection.
    Snapshot {
        /// The collection delivered.
        collection: Collection,
        /// Documents keyed by entity id.
        documents: BTreeMap<Uuid, Value>,
    },
    /// The feed failed; no further deliveries follow until resubscribed.
    Error {
        /// The collection whose feed failed.
        collection: Collection,
        /// Failure description.
        message: String,
    },
}

impl FeedEvent {
    /// The collection this event belongs to.
    pub fn collection(&self) -> Collection {
        match self {
            Self::Snapshot { collection, .. } | Self::Error { collection, .. } => *collection,
        }
    }
}
