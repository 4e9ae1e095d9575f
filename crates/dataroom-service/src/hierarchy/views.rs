//! Derived read-only views for presentation code.

use std::cmp::Ordering;
use std::collections::HashSet;

use dataroom_core::result::AppResult;
use dataroom_core::types::{FolderId, RoomId, SortDirection, SortKey};
use dataroom_entity::{FileRecord, Folder, FolderNode, Room};
use serde::Serialize;

use super::model::{Hierarchy, ItemId};

/// Counts below a folder or inside a room.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DescendantStats {
    /// Folders, not counting the starting folder or room root.
    pub folder_count: u64,
    /// Files anywhere in the subtree.
    pub file_count: u64,
}

/// Direct children of a folder.
#[derive(Debug, Clone, Default)]
pub struct FolderListing<'a> {
    /// Child folders.
    pub folders: Vec<&'a Folder>,
    /// Child files.
    pub files: Vec<&'a FileRecord>,
}

impl FolderListing<'_> {
    /// Ids of every listed item, folders first.
    pub fn item_ids(&self) -> Vec<ItemId> {
        self.folders
            .iter()
            .map(|f| ItemId::Folder(f.id))
            .chain(self.files.iter().map(|f| ItemId::File(f.id)))
            .collect()
    }

    /// Whether nothing is listed.
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }
}

fn by_name(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

impl<'a> Hierarchy<'a> {
    /// Child folders ordered by case-insensitive name.
    pub fn sorted_child_folders(&self, folder_id: FolderId) -> Vec<&'a Folder> {
        let snapshot = self.snapshot();
        let mut folders: Vec<&Folder> = snapshot
            .folder(folder_id)
            .map(|folder| {
                folder
                    .child_folder_ids
                    .iter()
                    .filter_map(|id| snapshot.folder(*id))
                    .collect()
            })
            .unwrap_or_default();
        folders.sort_by(|a, b| by_name(&a.name, &b.name).then(a.id.cmp(&b.id)));
        folders
    }

    /// Files of a folder ordered by case-insensitive name.
    pub fn sorted_files(&self, folder_id: FolderId) -> Vec<&'a FileRecord> {
        self.sorted_files_by(folder_id, SortKey::Name, SortDirection::Asc)
    }

    /// Files of a folder in the requested order.
    pub fn sorted_files_by(
        &self,
        folder_id: FolderId,
        key: SortKey,
        direction: SortDirection,
    ) -> Vec<&'a FileRecord> {
        let snapshot = self.snapshot();
        let mut files: Vec<&FileRecord> = snapshot
            .folder(folder_id)
            .map(|folder| {
                folder
                    .file_ids
                    .iter()
                    .filter_map(|id| snapshot.file(*id))
                    .collect()
            })
            .unwrap_or_default();
        files.sort_by(|a, b| {
            let primary = match key {
                SortKey::Name => by_name(&a.name, &b.name),
                SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
                SortKey::Size => a.size_bytes.cmp(&b.size_bytes),
            };
            direction.apply(primary.then_with(|| by_name(&a.name, &b.name)).then(a.id.cmp(&b.id)))
        });
        files
    }

    /// Sorted children whose names satisfy `matches`.
    ///
    /// The matching policy belongs to the caller; this only narrows.
    pub fn children_matching(
        &self,
        folder_id: FolderId,
        matches: impl Fn(&str) -> bool,
    ) -> FolderListing<'a> {
        FolderListing {
            folders: self
                .sorted_child_folders(folder_id)
                .into_iter()
                .filter(|folder| matches(&folder.name))
                .collect(),
            files: self
                .sorted_files(folder_id)
                .into_iter()
                .filter(|file| matches(&file.name))
                .collect(),
        }
    }

    /// Breadcrumbs from the room root down to `folder_id`.
    pub fn path_to_root(&self, folder_id: FolderId) -> AppResult<Vec<&'a Folder>> {
        let mut path = vec![self.folder(folder_id)?];
        let mut seen = HashSet::from([folder_id]);
        while let Some(parent_id) = path.last().and_then(|folder| folder.parent_id) {
            if !seen.insert(parent_id) {
                break;
            }
            match self.snapshot().folder(parent_id) {
                Some(parent) => path.push(parent),
                None => break,
            }
        }
        path.reverse();
        Ok(path)
    }

    /// Folders strictly below `folder_id` and files anywhere inside it.
    pub fn descendant_stats(&self, folder_id: FolderId) -> AppResult<DescendantStats> {
        self.folder(folder_id)?;
        let (folders, files) = self.file_cascade([folder_id]);
        Ok(DescendantStats {
            folder_count: folders.len().saturating_sub(1) as u64,
            file_count: files.len() as u64,
        })
    }

    /// Folder and file counts of a room; the root is not counted.
    pub fn room_stats(&self, room_id: RoomId) -> AppResult<DescendantStats> {
        self.room(room_id)?;
        let folders = self
            .snapshot()
            .folders
            .values()
            .filter(|folder| folder.room_id == room_id && !folder.is_root())
            .count();
        Ok(DescendantStats {
            folder_count: folders as u64,
            file_count: self.room_file_ids(room_id).len() as u64,
        })
    }

    /// Rooms ordered by case-insensitive name.
    pub fn sorted_rooms(&self) -> Vec<&'a Room> {
        let mut rooms: Vec<&Room> = self.snapshot().rooms.values().collect();
        rooms.sort_by(|a, b| by_name(&a.name, &b.name).then(a.id.cmp(&b.id)));
        rooms
    }

    /// First room by name, used whenever activation has to fall back.
    pub fn first_room(&self) -> Option<&'a Room> {
        self.sorted_rooms().into_iter().next()
    }

    /// Nested view of the folders below `folder_id`.
    pub fn folder_tree(&self, folder_id: FolderId) -> AppResult<FolderNode> {
        let folder = self.folder(folder_id)?;
        let mut seen = HashSet::new();
        Ok(self.build_node(folder, 0, &mut seen))
    }

    fn build_node(&self, folder: &Folder, depth: u32, seen: &mut HashSet<FolderId>) -> FolderNode {
        seen.insert(folder.id);
        let children: Vec<FolderNode> = self
            .sorted_child_folders(folder.id)
            .into_iter()
            .filter(|child| !seen.contains(&child.id))
            .collect::<Vec<_>>()
            .into_iter()
            .map(|child| self.build_node(child, depth + 1, seen))
            .collect();

        FolderNode {
            id: folder.id,
            name: folder.name.clone(),
            depth,
            child_count: children.len() as u64,
            file_count: folder.file_ids.len() as u64,
            children,
        }
    }
}
