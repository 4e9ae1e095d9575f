//! Multi-item moves with a cycle guard and batch-aware naming.

use std::collections::HashSet;

use dataroom_core::result::AppResult;
use dataroom_core::types::{FileId, FolderId, RoomId};
use dataroom_entity::Snapshot;
use tracing::{debug, info};

use super::engine::{MutationEngine, repair_active};
use super::outcome::{Applied, MoveOutcome};
use crate::hierarchy::Hierarchy;
use crate::naming::unique_folder_name;

impl MutationEngine {
    /// Move folders and files into `target_id`.
    ///
    /// Folders go first, then files, each in caller order. Names are
    /// uniquified against the target's children as they accumulate during
    /// the batch. An item already in the target is left alone and counted
    /// as neither moved nor skipped; a room root or a folder that would
    /// become its own ancestor is skipped. Unknown ids are ignored. An
    /// active folder carried into another room hands activation back to
    /// its nearest ancestor left behind.
    pub fn move_items(
        &self,
        snapshot: &Snapshot,
        target_id: FolderId,
        folder_ids: &[FolderId],
        file_ids: &[FileId],
    ) -> AppResult<Applied<MoveOutcome>> {
        let target_room = Hierarchy::new(snapshot).folder(target_id)?.room_id;

        let mut next = snapshot.clone();
        let mut used = Hierarchy::new(snapshot).sibling_names(target_id, None);
        let mut outcome = MoveOutcome::default();

        for &folder_id in folder_ids {
            let hierarchy = Hierarchy::new(&next);
            let Some(folder) = next.folder(folder_id) else {
                continue;
            };
            if folder.parent_id == Some(target_id) {
                continue;
            }
            let Some(old_parent) = folder.parent_id else {
                debug!(folder_id = %folder_id, "Room root cannot be moved");
                outcome.skipped += 1;
                continue;
            };
            let subtree = hierarchy.descendant_closure(folder_id, true);
            if subtree.contains(&target_id) {
                debug!(folder_id = %folder_id, target_id = %target_id, "Move would create a cycle");
                outcome.skipped += 1;
                continue;
            }

            let name = unique_folder_name(&folder.name, &used);
            used.insert(name.to_lowercase());
            let cross_room = folder.room_id != target_room;
            let files_below = if cross_room {
                hierarchy.file_cascade([folder_id]).1
            } else {
                HashSet::new()
            };

            if let Some(parent) = next.folders.get_mut(&old_parent) {
                parent.detach_folder(folder_id);
            }
            if let Some(folder) = next.folders.get_mut(&folder_id) {
                folder.name = name;
                folder.parent_id = Some(target_id);
            }
            if let Some(target) = next.folders.get_mut(&target_id) {
                target.attach_folder(folder_id);
            }
            if cross_room {
                reassign_room(&mut next, &subtree, &files_below, target_room);
            }

            outcome.moved += 1;
            outcome.moved_folder_ids.push(folder_id);
        }

        for &file_id in file_ids {
            let Some(file) = next.file(file_id) else {
                continue;
            };
            if file.parent_folder_id == target_id {
                continue;
            }
            let old_parent = file.parent_folder_id;
            let name = self.policy.unique_file_name(&file.name, &used);
            used.insert(name.to_lowercase());

            if let Some(parent) = next.folders.get_mut(&old_parent) {
                parent.detach_file(file_id);
            }
            if let Some(file) = next.files.get_mut(&file_id) {
                file.name = name;
                file.parent_folder_id = target_id;
                file.room_id = target_room;
            }
            if let Some(target) = next.folders.get_mut(&target_id) {
                target.attach_file(file_id);
            }

            outcome.moved += 1;
            outcome.moved_file_ids.push(file_id);
        }
        repair_active(snapshot, &mut next);

        info!(
            target_id = %target_id,
            moved = outcome.moved,
            skipped = outcome.skipped,
            "Items moved"
        );
        Ok(Applied::new(next, outcome))
    }
}

fn reassign_room(
    next: &mut Snapshot,
    folders: &HashSet<FolderId>,
    files: &HashSet<FileId>,
    room_id: RoomId,
) {
    for id in folders {
        if let Some(folder) = next.folders.get_mut(id) {
            folder.room_id = room_id;
        }
    }
    for id in files {
        if let Some(file) = next.files.get_mut(id) {
            file.room_id = room_id;
        }
    }
}
