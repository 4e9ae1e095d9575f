//! Change notifications published to snapshot observers.

use serde::{Deserialize, Serialize};

use crate::types::{Collection, RoomId, UserId};

/// Where an applied change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOrigin {
    /// A mutation issued by this session.
    Local,
    /// A remote feed delivery.
    Remote,
}

/// Notification that a new snapshot was published.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkspaceEvent {
    /// The snapshot changed.
    SnapshotChanged {
        /// Source of the change.
        origin: ChangeOrigin,
        /// Name of the operation or feed that produced it.
        operation: String,
    },
    /// A collection feed reached the ready state.
    FeedReady {
        /// The collection.
        collection: Collection,
    },
    /// A collection feed failed.
    FeedFailed {
        /// The collection.
        collection: Collection,
        /// Failure description.
        message: String,
    },
    /// The active room changed.
    ActiveRoomChanged {
        /// The new active room, if any.
        room_id: Option<RoomId>,
    },
    /// The session identity changed.
    SessionChanged {
        /// The signed-in user, or `None` after sign-out.
        user_id: Option<UserId>,
    },
}
