//! Shared snapshot fixtures for unit tests.

use dataroom_core::types::{FileId, FolderId, RoomId};
use dataroom_entity::{FileOrigin, FileRecord, Folder, Room, Snapshot};

/// Room "Acme" with root → A → B, file X in B and file Y in the root.
pub(crate) struct Fixture {
    pub snapshot: Snapshot,
    pub room: RoomId,
    pub root: FolderId,
    pub a: FolderId,
    pub b: FolderId,
    pub x: FileId,
    pub y: FileId,
}

pub(crate) fn fixture() -> Fixture {
    let root_id = FolderId::new();
    let room = Room::new("Acme", root_id);
    let mut root = Folder::with_id(root_id, "All documents", None, room.id);
    let mut a = Folder::new("A", Some(root_id), room.id);
    let mut b = Folder::new("B", Some(a.id), room.id);
    let x = FileRecord::new(FileId::new(), "X.pdf", b.id, room.id, 1, FileOrigin::Upload);
    let y = FileRecord::new(FileId::new(), "Y.pdf", root_id, room.id, 1, FileOrigin::Upload);
    root.attach_folder(a.id);
    root.attach_file(y.id);
    a.attach_folder(b.id);
    b.attach_file(x.id);

    let (room_id, a_id, b_id, x_id, y_id) = (room.id, a.id, b.id, x.id, y.id);

    let mut snapshot = Snapshot::new();
    snapshot.rooms.insert(room.id, room);
    for folder in [root, a, b] {
        snapshot.folders.insert(folder.id, folder);
    }
    for file in [x, y] {
        snapshot.files.insert(file.id, file);
    }
    snapshot.active_room_id = Some(room_id);
    snapshot.active_folder_id = Some(root_id);

    Fixture {
        snapshot,
        room: room_id,
        root: root_id,
        a: a_id,
        b: b_id,
        x: x_id,
        y: y_id,
    }
}

/// Add a second room with an empty root; returns (room, root).
pub(crate) fn add_room(snapshot: &mut Snapshot, name: &str) -> (RoomId, FolderId) {
    let root_id = FolderId::new();
    let room = Room::new(name, root_id);
    let room_id = room.id;
    snapshot
        .folders
        .insert(root_id, Folder::with_id(root_id, "All documents", None, room_id));
    snapshot.rooms.insert(room_id, room);
    (room_id, root_id)
}
