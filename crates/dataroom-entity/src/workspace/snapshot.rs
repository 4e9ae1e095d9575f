//! Id-indexed arena holding every room, folder and file of a session.

use std::collections::HashMap;

use dataroom_core::types::{ContentRef, FileId, FolderId, RoomId};
use serde::{Deserialize, Serialize};

use crate::file::FileRecord;
use crate::folder::Folder;
use crate::room::Room;

/// The full normalized workspace state at one point in time.
///
/// Snapshots are values: producing a change means building a new snapshot
/// and publishing it, never editing one that readers may hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Rooms by id.
    #[serde(default)]
    pub rooms: HashMap<RoomId, Room>,
    /// Folders by id.
    #[serde(default)]
    pub folders: HashMap<FolderId, Folder>,
    /// File records by id.
    #[serde(default)]
    pub files: HashMap<FileId, FileRecord>,
    /// The room currently shown.
    #[serde(default)]
    pub active_room_id: Option<RoomId>,
    /// The folder currently shown.
    #[serde(default)]
    pub active_folder_id: Option<FolderId>,
}

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the workspace holds no rooms.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Look up a room.
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    /// Look up a folder.
    pub fn folder(&self, id: FolderId) -> Option<&Folder> {
        self.folders.get(&id)
    }

    /// Look up a file record.
    pub fn file(&self, id: FileId) -> Option<&FileRecord> {
        self.files.get(&id)
    }

    /// Whether `id` is the root folder of any room.
    pub fn is_room_root(&self, id: FolderId) -> bool {
        self.rooms.values().any(|room| room.root_folder_id == id)
    }

    /// Content handles currently held, by file id.
    pub fn content_refs(&self) -> HashMap<FileId, ContentRef> {
        self.files
            .values()
            .filter_map(|file| file.content_ref.clone().map(|r| (file.id, r)))
            .collect()
    }

    /// Drop every content handle. Cached payloads themselves are untouched.
    pub fn release_content_refs(&mut self) -> usize {
        let mut released = 0;
        for file in self.files.values_mut() {
            if file.content_ref.take().is_some() {
                released += 1;
            }
        }
        released
    }

    /// Attach cached content handles to the matching records.
    ///
    /// Handles for ids without a record are ignored. Returns how many
    /// records were hydrated.
    pub fn hydrate(&mut self, refs: &HashMap<FileId, ContentRef>) -> usize {
        let mut hydrated = 0;
        for (id, content) in refs {
            if let Some(file) = self.files.get_mut(id) {
                file.content_ref = Some(content.clone());
                hydrated += 1;
            }
        }
        hydrated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::FileOrigin;

    fn sample() -> (Snapshot, FileId) {
        let mut snapshot = Snapshot::new();
        let root = FolderId::new();
        let room = Room::new("Acme", root);
        let mut folder = Folder::with_id(root, "All documents", None, room.id);
        let file = FileRecord::new(FileId::new(), "a.pdf", root, room.id, 3, FileOrigin::Upload);
        folder.attach_file(file.id);
        let file_id = file.id;
        snapshot.folders.insert(root, folder);
        snapshot.files.insert(file.id, file);
        snapshot.rooms.insert(room.id, room);
        (snapshot, file_id)
    }

    #[test]
    fn test_hydrate_and_release() {
        let (mut snapshot, file_id) = sample();
        let mut refs = HashMap::new();
        refs.insert(file_id, ContentRef::new("memory://local/a", 3));
        refs.insert(FileId::new(), ContentRef::new("memory://local/b", 1));

        assert_eq!(snapshot.hydrate(&refs), 1);
        assert!(snapshot.file(file_id).is_some_and(FileRecord::is_hydrated));
        assert_eq!(snapshot.content_refs().len(), 1);

        assert_eq!(snapshot.release_content_refs(), 1);
        assert!(snapshot.file(file_id).is_some_and(|f| !f.is_hydrated()));
    }

    #[test]
    fn test_json_roundtrip_keeps_structure() {
        let (snapshot, _) = sample();
        let json = serde_json::to_string(&snapshot).expect("serialize");
        let back: Snapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, snapshot);
        let root = back.rooms.values().next().map(|r| r.root_folder_id);
        assert!(root.is_some_and(|id| back.is_room_root(id)));
    }
}
