//! Merge rules for whole-collection feed deliveries.
//!
//! Each delivery replaces one collection. The active pointers are then
//! repaired against what arrived, without waiting for the other feeds.

use std::collections::{BTreeMap, HashMap};

use dataroom_core::types::Collection;
use dataroom_entity::{FileRecord, Folder, Preferences, Room, Snapshot};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::hierarchy::Hierarchy;

/// Decode feed documents, skipping any that do not parse.
pub fn decode_documents<T: DeserializeOwned>(
    collection: Collection,
    documents: &BTreeMap<Uuid, Value>,
) -> Vec<T> {
    documents
        .iter()
        .filter_map(|(id, doc)| match serde_json::from_value(doc.clone()) {
            Ok(entity) => Some(entity),
            Err(e) => {
                warn!(%collection, %id, error = %e, "Skipping undecodable document");
                None
            }
        })
        .collect()
}

/// Produce the snapshot after one collection delivery.
pub fn apply_delivery(
    snapshot: &Snapshot,
    collection: Collection,
    documents: &BTreeMap<Uuid, Value>,
) -> Snapshot {
    let next = match collection {
        Collection::Rooms => merge_rooms(snapshot, decode_documents(collection, documents)),
        Collection::Folders => merge_folders(snapshot, decode_documents(collection, documents)),
        Collection::Files => merge_files(snapshot, decode_documents(collection, documents)),
    };
    debug!(%collection, documents = documents.len(), "Feed delivery merged");
    next
}

/// Replace rooms. The active room survives if it still exists; otherwise
/// the first room by name becomes active at its root.
pub fn merge_rooms(snapshot: &Snapshot, rooms: Vec<Room>) -> Snapshot {
    let mut next = snapshot.clone();
    next.rooms = rooms.into_iter().map(|room| (room.id, room)).collect();

    let active_alive = next
        .active_room_id
        .is_some_and(|id| next.rooms.contains_key(&id));
    if !active_alive {
        let fallback = Hierarchy::new(&next)
            .first_room()
            .map(|room| (room.id, room.root_folder_id));
        next.active_room_id = fallback.map(|(room, _)| room);
        next.active_folder_id = fallback.map(|(_, root)| root);
    }
    next
}

/// Replace folders. A missing active folder falls back to the active
/// room's root id, even before that root record has arrived.
pub fn merge_folders(snapshot: &Snapshot, folders: Vec<Folder>) -> Snapshot {
    let mut next = snapshot.clone();
    next.folders = folders.into_iter().map(|folder| (folder.id, folder)).collect();

    let active_alive = next
        .active_folder_id
        .is_some_and(|id| next.folders.contains_key(&id));
    if !active_alive {
        next.active_folder_id = next
            .active_room_id
            .and_then(|id| next.room(id))
            .map(|room| room.root_folder_id);
    }
    next
}

/// Replace files, carrying over content handles held for the same ids.
pub fn merge_files(snapshot: &Snapshot, files: Vec<FileRecord>) -> Snapshot {
    let held = snapshot.content_refs();
    let mut next = snapshot.clone();
    next.files = files
        .into_iter()
        .map(|mut file| {
            file.content_ref = held.get(&file.id).cloned();
            (file.id, file)
        })
        .collect::<HashMap<_, _>>();
    next
}

/// Apply stored preferences when they point at a room and one of its
/// folders. With nothing applicable and no active room, the first room by
/// name is activated. Returns whether the preferences were used.
pub fn apply_preferences(snapshot: &mut Snapshot, preferences: Option<&Preferences>) -> bool {
    let applicable = preferences.and_then(|prefs| {
        let room = snapshot.room(prefs.active_room_id?)?;
        let folder = match prefs.active_folder_id {
            Some(id) => snapshot.folder(id).filter(|f| f.room_id == room.id)?.id,
            None => room.root_folder_id,
        };
        Some((room.id, folder))
    });

    if let Some((room, folder)) = applicable {
        snapshot.active_room_id = Some(room);
        snapshot.active_folder_id = Some(folder);
        return true;
    }

    let active_alive = snapshot
        .active_room_id
        .is_some_and(|id| snapshot.rooms.contains_key(&id));
    if !active_alive {
        let fallback = Hierarchy::new(snapshot)
            .first_room()
            .map(|room| (room.id, room.root_folder_id));
        snapshot.active_room_id = fallback.map(|(room, _)| room);
        snapshot.active_folder_id = fallback.map(|(_, root)| root);
    }
    false
}
