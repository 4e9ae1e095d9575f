//! Per-collection feed state machine.

use std::collections::BTreeMap;
use std::fmt;

use dataroom_core::types::Collection;
use serde::Serialize;

/// Lifecycle of one collection feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum FeedState {
    /// Not subscribed.
    #[default]
    Uninitialized,
    /// Subscribed, waiting for the first delivery.
    Syncing,
    /// At least one delivery applied.
    Ready,
    /// The feed reported a failure.
    Error(String),
}

impl FeedState {
    /// Whether the feed will not change state without new input.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Ready | Self::Error(_))
    }
}

impl fmt::Display for FeedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Syncing => write!(f, "syncing"),
            Self::Ready => write!(f, "ready"),
            Self::Error(message) => write!(f, "error: {message}"),
        }
    }
}

/// States of all three collection feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedTracker {
    states: BTreeMap<Collection, FeedState>,
}

impl FeedTracker {
    /// Every feed uninitialized.
    pub fn new() -> Self {
        Self {
            states: Collection::ALL
                .into_iter()
                .map(|c| (c, FeedState::Uninitialized))
                .collect(),
        }
    }

    /// Current state of one feed.
    pub fn state(&self, collection: Collection) -> &FeedState {
        self.states.get(&collection).unwrap_or(&FeedState::Uninitialized)
    }

    /// Move every feed to syncing after subscribing.
    pub fn start(&mut self) {
        for state in self.states.values_mut() {
            *state = FeedState::Syncing;
        }
    }

    /// Record a delivery. Returns true on the transition into ready.
    pub fn mark_ready(&mut self, collection: Collection) -> bool {
        let previous = self.states.insert(collection, FeedState::Ready);
        previous != Some(FeedState::Ready)
    }

    /// Record a feed failure.
    pub fn mark_error(&mut self, collection: Collection, message: impl Into<String>) {
        self.states.insert(collection, FeedState::Error(message.into()));
    }

    /// Whether every feed is ready or failed.
    pub fn all_settled(&self) -> bool {
        self.states.values().all(FeedState::is_settled)
    }

    /// Whether every feed is ready.
    pub fn all_ready(&self) -> bool {
        self.states.values().all(|s| *s == FeedState::Ready)
    }

    /// Back to uninitialized.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Snapshot of every feed state, in subscription order.
    pub fn statuses(&self) -> Vec<(Collection, FeedState)> {
        Collection::ALL
            .into_iter()
            .map(|c| (c, self.state(c).clone()))
            .collect()
    }
}

impl Default for FeedTracker {
    fn default() -> Self {
        Self::new()
    }
}
