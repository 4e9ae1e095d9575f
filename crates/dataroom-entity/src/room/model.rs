//! Room entity model.

use chrono::{DateTime, Utc};
use dataroom_core::types::{FolderId, RoomId};
use serde::{Deserialize, Serialize};

/// A top-level workspace container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: RoomId,
    /// Room name.
    pub name: String,
    /// The room's root folder, created and destroyed with the room.
    pub root_folder_id: FolderId,
    /// When the room was created.
    pub created_at: DateTime<Utc>,
}

impl Room {
    /// Create a room pointing at an already allocated root folder id.
    pub fn new(name: impl Into<String>, root_folder_id: FolderId) -> Self {
        Self {
            id: RoomId::new(),
            name: name.into(),
            root_folder_id,
            created_at: Utc::now(),
        }
    }
}
