//! Hierarchy lookups and descendant closure.

use std::collections::HashSet;
use std::fmt;

use dataroom_core::error::AppError;
use dataroom_core::result::AppResult;
use dataroom_core::types::{FileId, FolderId, RoomId};
use dataroom_entity::{FileRecord, Folder, Room, Snapshot};
use serde::{Deserialize, Serialize};

/// A folder or file child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ItemId {
    /// A folder.
    Folder(FolderId),
    /// A file record.
    File(FileId),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Folder(id) => write!(f, "folder:{id}"),
            Self::File(id) => write!(f, "file:{id}"),
        }
    }
}

/// Read-only view over one snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Hierarchy<'a> {
    snapshot: &'a Snapshot,
}

impl<'a> Hierarchy<'a> {
    /// Wrap a snapshot.
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self { snapshot }
    }

    /// The underlying snapshot.
    pub fn snapshot(&self) -> &'a Snapshot {
        self.snapshot
    }

    /// Look up a room.
    pub fn room(&self, id: RoomId) -> AppResult<&'a Room> {
        self.snapshot
            .room(id)
            .ok_or_else(|| AppError::not_found(format!("Room {id} not found")))
    }

    /// Look up a folder.
    pub fn folder(&self, id: FolderId) -> AppResult<&'a Folder> {
        self.snapshot
            .folder(id)
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    /// Look up a file record.
    pub fn file(&self, id: FileId) -> AppResult<&'a FileRecord> {
        self.snapshot
            .file(id)
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))
    }

    /// The root folder of a room.
    pub fn room_root(&self, room_id: RoomId) -> AppResult<&'a Folder> {
        let room = self.room(room_id)?;
        self.folder(room.root_folder_id)
    }

    /// All folder ids reachable from `id` through child links.
    ///
    /// `id` itself is included only when `include_self` is set. A missing
    /// folder has an empty closure.
    pub fn descendant_closure(&self, id: FolderId, include_self: bool) -> HashSet<FolderId> {
        let mut visited = HashSet::new();
        if self.snapshot.folder(id).is_none() {
            return visited;
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            if let Some(folder) = self.snapshot.folder(current) {
                stack.extend(
                    folder
                        .child_folder_ids
                        .iter()
                        .filter(|child| !visited.contains(*child)),
                );
            }
        }

        if !include_self {
            visited.remove(&id);
        }
        visited
    }

    /// Whether `candidate` is `folder` or lies below it.
    pub fn is_within(&self, candidate: FolderId, folder: FolderId) -> bool {
        self.descendant_closure(folder, true).contains(&candidate)
    }

    /// Lowercase names of the direct children of a folder.
    ///
    /// `exclude` leaves one child out, for renaming in place.
    pub fn sibling_names(&self, folder_id: FolderId, exclude: Option<ItemId>) -> HashSet<String> {
        let Some(folder) = self.snapshot.folder(folder_id) else {
            return HashSet::new();
        };

        let folders = folder
            .child_folder_ids
            .iter()
            .filter(|id| exclude != Some(ItemId::Folder(**id)))
            .filter_map(|id| self.snapshot.folder(*id))
            .map(|child| child.name.to_lowercase());
        let files = folder
            .file_ids
            .iter()
            .filter(|id| exclude != Some(ItemId::File(**id)))
            .filter_map(|id| self.snapshot.file(*id))
            .map(|file| file.name.to_lowercase());

        folders.chain(files).collect()
    }

    /// Every folder in the closures of `roots` plus every file they contain.
    pub fn file_cascade(
        &self,
        roots: impl IntoIterator<Item = FolderId>,
    ) -> (HashSet<FolderId>, HashSet<FileId>) {
        let mut folders = HashSet::new();
        for root in roots {
            folders.extend(self.descendant_closure(root, true));
        }

        let mut files: HashSet<FileId> = folders
            .iter()
            .filter_map(|id| self.snapshot.folder(*id))
            .flat_map(|folder| folder.file_ids.iter().copied())
            .collect();
        files.extend(
            self.snapshot
                .files
                .values()
                .filter(|file| folders.contains(&file.parent_folder_id))
                .map(|file| file.id),
        );

        (folders, files)
    }

    /// Folder ids belonging to a room, root included.
    pub fn room_folder_ids(&self, room_id: RoomId) -> HashSet<FolderId> {
        self.snapshot
            .folders
            .values()
            .filter(|folder| folder.room_id == room_id)
            .map(|folder| folder.id)
            .collect()
    }

    /// File ids belonging to a room.
    pub fn room_file_ids(&self, room_id: RoomId) -> HashSet<FileId> {
        self.snapshot
            .files
            .values()
            .filter(|file| file.room_id == room_id)
            .map(|file| file.id)
            .collect()
    }

    /// Nearest folder at or above `id` (by the parent chain in this
    /// snapshot) that satisfies `keep`.
    pub fn nearest_ancestor(
        &self,
        id: FolderId,
        keep: impl Fn(FolderId) -> bool,
    ) -> Option<FolderId> {
        let mut seen = HashSet::new();
        let mut current = Some(id);
        while let Some(folder_id) = current {
            if !seen.insert(folder_id) {
                return None;
            }
            if keep(folder_id) {
                return Some(folder_id);
            }
            current = self.snapshot.folder(folder_id).and_then(|f| f.parent_id);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture;

    #[test]
    fn test_descendant_closure() {
        let fx = fixture();
        let h = Hierarchy::new(&fx.snapshot);
        assert_eq!(h.descendant_closure(fx.a, false), HashSet::from([fx.b]));
        assert_eq!(h.descendant_closure(fx.a, true), HashSet::from([fx.a, fx.b]));
        assert!(h.descendant_closure(FolderId::new(), true).is_empty());
        assert!(h.is_within(fx.b, fx.root));
        assert!(!h.is_within(fx.root, fx.b));
    }

    #[test]
    fn test_closure_terminates_on_cycle() {
        let mut fx = fixture();
        let (a, b) = (fx.a, fx.b);
        if let Some(folder) = fx.snapshot.folders.get_mut(&b) {
            folder.attach_folder(a);
        }
        let h = Hierarchy::new(&fx.snapshot);
        assert_eq!(h.descendant_closure(a, true), HashSet::from([a, b]));
        assert!(h.descendant_closure(a, false).contains(&b));
    }

    #[test]
    fn test_sibling_names() {
        let fx = fixture();
        let h = Hierarchy::new(&fx.snapshot);
        assert_eq!(
            h.sibling_names(fx.root, None),
            HashSet::from(["a".to_string(), "y.pdf".to_string()])
        );
        assert_eq!(
            h.sibling_names(fx.root, Some(ItemId::Folder(fx.a))),
            HashSet::from(["y.pdf".to_string()])
        );
        assert!(h.sibling_names(FolderId::new(), None).is_empty());
    }

    #[test]
    fn test_lookup_not_found() {
        let fx = fixture();
        let h = Hierarchy::new(&fx.snapshot);
        assert!(h.folder(fx.a).is_ok());
        let err = h.file(FileId::new()).unwrap_err();
        assert_eq!(err.kind, dataroom_core::ErrorKind::NotFound);
    }

    #[test]
    fn test_file_cascade() {
        let fx = fixture();
        let h = Hierarchy::new(&fx.snapshot);
        let (folders, files) = h.file_cascade([fx.a]);
        assert_eq!(folders, HashSet::from([fx.a, fx.b]));
        assert_eq!(files, HashSet::from([fx.x]));
    }

    #[test]
    fn test_nearest_ancestor() {
        let fx = fixture();
        let h = Hierarchy::new(&fx.snapshot);
        let gone = HashSet::from([fx.a, fx.b]);
        assert_eq!(h.nearest_ancestor(fx.b, |id| !gone.contains(&id)), Some(fx.root));
        assert_eq!(h.nearest_ancestor(fx.b, |_| true), Some(fx.b));
    }
}
