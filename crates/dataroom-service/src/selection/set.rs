//! Multi-select id sets.

use std::collections::BTreeSet;

use dataroom_core::types::{FileId, FolderId};
use dataroom_entity::Snapshot;

use super::drag::DragPayload;
use crate::hierarchy::{FolderListing, ItemId};

/// Two independent sets of selected ids.
///
/// Ordered sets keep payloads and listings deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    folder_ids: BTreeSet<FolderId>,
    file_ids: BTreeSet<FileId>,
}

impl Selection {
    /// An empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a folder's membership. Returns whether it is now selected.
    pub fn toggle_folder(&mut self, id: FolderId) -> bool {
        if self.folder_ids.remove(&id) {
            false
        } else {
            self.folder_ids.insert(id)
        }
    }

    /// Flip a file's membership. Returns whether it is now selected.
    pub fn toggle_file(&mut self, id: FileId) -> bool {
        if self.file_ids.remove(&id) {
            false
        } else {
            self.file_ids.insert(id)
        }
    }

    /// Flip membership of either kind of item.
    pub fn toggle(&mut self, item: ItemId) -> bool {
        match item {
            ItemId::Folder(id) => self.toggle_folder(id),
            ItemId::File(id) => self.toggle_file(id),
        }
    }

    /// Replace the selection with exactly the items currently listed.
    ///
    /// Pass the filtered listing, not the full folder contents.
    pub fn select_all_visible(&mut self, visible: &FolderListing<'_>) {
        self.folder_ids = visible.folders.iter().map(|f| f.id).collect();
        self.file_ids = visible.files.iter().map(|f| f.id).collect();
    }

    pub fn clear(&mut self) {
        self.folder_ids.clear();
        self.file_ids.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.folder_ids.is_empty() && self.file_ids.is_empty()
    }

    /// Selected items of both kinds.
    pub fn len(&self) -> usize {
        self.folder_ids.len() + self.file_ids.len()
    }

    pub fn contains(&self, item: ItemId) -> bool {
        match item {
            ItemId::Folder(id) => self.folder_ids.contains(&id),
            ItemId::File(id) => self.file_ids.contains(&id),
        }
    }

    /// Selected folders in id order.
    pub fn folder_ids(&self) -> impl Iterator<Item = FolderId> + '_ {
        self.folder_ids.iter().copied()
    }

    /// Selected files in id order.
    pub fn file_ids(&self) -> impl Iterator<Item = FileId> + '_ {
        self.file_ids.iter().copied()
    }

    /// Drop ids that no longer exist in `snapshot`. Returns how many went.
    pub fn retain_existing(&mut self, snapshot: &Snapshot) -> usize {
        let before = self.len();
        self.folder_ids.retain(|id| snapshot.folders.contains_key(id));
        self.file_ids.retain(|id| snapshot.files.contains_key(id));
        before - self.len()
    }

    /// Payload for a drag started on `item`.
    ///
    /// A selected item carries the whole selection; any other item travels
    /// alone. The selection itself is never changed.
    pub fn drag_payload(&self, item: ItemId) -> DragPayload {
        if self.contains(item) {
            DragPayload::new(self.folder_ids().collect(), self.file_ids().collect())
        } else {
            DragPayload::single(item)
        }
    }
}
