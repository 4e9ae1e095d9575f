//! Room lifecycle: a room and its root folder live and die together.

use std::collections::HashSet;

use dataroom_core::error::AppError;
use dataroom_core::result::AppResult;
use dataroom_core::types::{FolderId, RoomId};
use dataroom_entity::{Folder, Room, Snapshot};
use tracing::info;

use super::engine::{MutationEngine, remove_entities, repair_active, required_name};
use super::outcome::{Applied, DeleteOutcome, RoomCreated};
use crate::hierarchy::Hierarchy;
use crate::naming::unique_folder_name;

impl MutationEngine {
    /// Create a room with its root folder and make it active.
    ///
    /// The name is uniquified against existing room names.
    pub fn create_room(&self, snapshot: &Snapshot, name: &str) -> AppResult<Applied<RoomCreated>> {
        let name = required_name(name, "Room")?;
        let used: HashSet<String> = snapshot
            .rooms
            .values()
            .map(|room| room.name.to_lowercase())
            .collect();
        let name = unique_folder_name(&name, &used);

        let root_id = FolderId::new();
        let room = Room::new(name, root_id);
        let root = Folder::with_id(root_id, self.root_folder_name.clone(), None, room.id);
        let created = RoomCreated {
            room_id: room.id,
            root_folder_id: root_id,
        };

        let mut next = snapshot.clone();
        info!(room_id = %room.id, name = %room.name, "Room created");
        next.folders.insert(root_id, root);
        next.rooms.insert(room.id, room);
        next.active_room_id = Some(created.room_id);
        next.active_folder_id = Some(root_id);

        Ok(Applied::new(next, created))
    }

    /// Rename a room. Another room with the same name (any case) is a
    /// validation error.
    pub fn rename_room(
        &self,
        snapshot: &Snapshot,
        room_id: RoomId,
        name: &str,
    ) -> AppResult<Applied<()>> {
        Hierarchy::new(snapshot).room(room_id)?;
        let name = required_name(name, "Room")?;
        let lowered = name.to_lowercase();
        let taken = snapshot
            .rooms
            .values()
            .any(|room| room.id != room_id && room.name.to_lowercase() == lowered);
        if taken {
            return Err(AppError::validation(format!(
                "A room named '{name}' already exists"
            )));
        }

        let mut next = snapshot.clone();
        if let Some(room) = next.rooms.get_mut(&room_id) {
            room.name = name;
        }
        info!(room_id = %room_id, "Room renamed");
        Ok(Applied::new(next, ()))
    }

    /// Delete a room together with its root and every folder and file in it.
    ///
    /// If the room was active, the first remaining room by name becomes
    /// active.
    pub fn delete_room(&self, snapshot: &Snapshot, room_id: RoomId) -> AppResult<Applied<DeleteOutcome>> {
        let hierarchy = Hierarchy::new(snapshot);
        let room = hierarchy.room(room_id)?;

        let mut folders = hierarchy.room_folder_ids(room_id);
        folders.insert(room.root_folder_id);
        let files = hierarchy.room_file_ids(room_id);

        let mut next = snapshot.clone();
        next.rooms.remove(&room_id);
        remove_entities(&mut next, &folders, &files);
        repair_active(snapshot, &mut next);

        info!(
            room_id = %room_id,
            folders = folders.len(),
            files = files.len(),
            "Room deleted"
        );

        Ok(Applied::new(
            next,
            DeleteOutcome {
                removed_folder_ids: folders,
                removed_file_ids: files,
                rejected_root_ids: Vec::new(),
            },
        ))
    }
}
