//! Events crossing component boundaries.
//!
//! [`FeedEvent`]s flow from the remote store into the synchronization
//! coordinator; [`WorkspaceEvent`]s flow from the coordinator to observers.

pub mod feed;
pub mod workspace;

pub use feed::FeedEvent;
pub use workspace::{ChangeOrigin, WorkspaceEvent};
