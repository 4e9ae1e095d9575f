//! Channel type definitions.

use std::fmt;

use dataroom_core::types::{Collection, UserId};
use serde::{Deserialize, Serialize};

/// A per-user collection feed, addressed as `users/<uid>/<collection>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeedChannel {
    /// Owner of the collection.
    pub user: UserId,
    /// The collection.
    pub collection: Collection,
}

impl FeedChannel {
    /// Create a channel handle.
    pub fn new(user: UserId, collection: Collection) -> Self {
        Self { user, collection }
    }

    /// The channel path string.
    pub fn to_channel_string(&self) -> String {
        format!("users/{}/{}", self.user, self.collection)
    }
}

impl fmt::Display for FeedChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_channel_string())
    }
}
