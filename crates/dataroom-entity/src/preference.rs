//! Per-user preference document.

use dataroom_core::types::{FolderId, RoomId};
use serde::{Deserialize, Serialize};

/// Last-active room and folder, persisted as one merge-patch document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// Last active room.
    #[serde(default)]
    pub active_room_id: Option<RoomId>,
    /// Last active folder.
    #[serde(default)]
    pub active_folder_id: Option<FolderId>,
}
