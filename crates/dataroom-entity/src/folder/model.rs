//! Folder entity model.

use chrono::{DateTime, Utc};
use dataroom_core::types::{FileId, FolderId, RoomId};
use serde::{Deserialize, Serialize};

/// A folder in a room's hierarchy.
///
/// `child_folder_ids` and `file_ids` mirror the parent pointers of the
/// children; the mutation engine keeps both sides in sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Parent folder ID (null only for a room's root).
    pub parent_id: Option<FolderId>,
    /// The room this folder belongs to.
    pub room_id: RoomId,
    /// Direct child folders.
    #[serde(default)]
    pub child_folder_ids: Vec<FolderId>,
    /// Files directly inside this folder.
    #[serde(default)]
    pub file_ids: Vec<FileId>,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
}

impl Folder {
    /// Create an empty folder.
    pub fn new(name: impl Into<String>, parent_id: Option<FolderId>, room_id: RoomId) -> Self {
        Self::with_id(FolderId::new(), name, parent_id, room_id)
    }

    /// Create an empty folder with a preallocated id.
    pub fn with_id(
        id: FolderId,
        name: impl Into<String>,
        parent_id: Option<FolderId>,
        room_id: RoomId,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            parent_id,
            room_id,
            child_folder_ids: Vec::new(),
            file_ids: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Check if this is a room root (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Append a child folder unless it is already listed.
    pub fn attach_folder(&mut self, id: FolderId) {
        if !self.child_folder_ids.contains(&id) {
            self.child_folder_ids.push(id);
        }
    }

    /// Append a file unless it is already listed.
    pub fn attach_file(&mut self, id: FileId) {
        if !self.file_ids.contains(&id) {
            self.file_ids.push(id);
        }
    }

    /// Remove a child folder from the list.
    pub fn detach_folder(&mut self, id: FolderId) {
        self.child_folder_ids.retain(|child| *child != id);
    }

    /// Remove a file from the list.
    pub fn detach_file(&mut self, id: FileId) {
        self.file_ids.retain(|file| *file != id);
    }

    /// Number of direct children of both kinds.
    pub fn child_count(&self) -> usize {
        self.child_folder_ids.len() + self.file_ids.len()
    }
}
