//! Reconciliation of local edits, remote feeds and the content cache.
//!
//! [`SyncCoordinator`] owns the published snapshot. Local mutations run
//! through the engine, then either apply directly (signed out) or are
//! written to the remote store first (signed in). Remote deliveries arrive
//! through one ordered queue and are merged by the rules in [`merge`],
//! with unconfirmed local writes laid over them by [`pending`].

pub mod coordinator;
pub mod feed;
pub mod merge;
pub mod pending;
pub mod plan;

pub use coordinator::SyncCoordinator;
pub use feed::{FeedState, FeedTracker};
pub use pending::PendingWrites;
pub use plan::{RemoteWrite, plan_writes, preference_patch};
