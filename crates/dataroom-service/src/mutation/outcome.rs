//! Results of engine operations.

use std::collections::HashSet;

use dataroom_core::types::{FileId, FolderId, RoomId};
use dataroom_entity::{FileOrigin, Snapshot};
use serde::Serialize;

/// A successfully applied operation: the new snapshot plus its output.
#[derive(Debug, Clone)]
pub struct Applied<T> {
    /// The snapshot after the operation.
    pub snapshot: Snapshot,
    /// Operation-specific result.
    pub output: T,
}

impl<T> Applied<T> {
    /// Pair a snapshot with an output.
    pub fn new(snapshot: Snapshot, output: T) -> Self {
        Self { snapshot, output }
    }

    /// Split into snapshot and output.
    pub fn into_parts(self) -> (Snapshot, T) {
        (self.snapshot, self.output)
    }
}

/// Ids allocated by room creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoomCreated {
    /// The new room.
    pub room_id: RoomId,
    /// Its root folder.
    pub root_folder_id: FolderId,
}

/// Result of a move batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MoveOutcome {
    /// Items reparented.
    pub moved: usize,
    /// Items refused: a cycle would form or the item is a room root.
    pub skipped: usize,
    /// Folders reparented, in processing order.
    pub moved_folder_ids: Vec<FolderId>,
    /// Files reparented, in processing order.
    pub moved_file_ids: Vec<FileId>,
}

/// Everything a delete removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    /// Folders removed.
    pub removed_folder_ids: HashSet<FolderId>,
    /// Files removed.
    pub removed_file_ids: HashSet<FileId>,
    /// Room roots that were requested but refused.
    pub rejected_root_ids: Vec<FolderId>,
}

impl DeleteOutcome {
    /// Whether anything was removed.
    pub fn is_empty(&self) -> bool {
        self.removed_folder_ids.is_empty() && self.removed_file_ids.is_empty()
    }
}

/// One file offered for upload.
///
/// The id is allocated up front so content can be cached under it before
/// the metadata exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// Id the record will get if admitted.
    pub id: FileId,
    /// Offered file name.
    pub name: String,
    /// Payload size.
    pub size_bytes: u64,
    /// Origin tag.
    pub origin: FileOrigin,
}

impl FileUpload {
    /// A user upload with a fresh id.
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            id: FileId::new(),
            name: name.into(),
            size_bytes,
            origin: FileOrigin::Upload,
        }
    }
}

/// Result of an upload batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadOutcome {
    /// Records created, in offer order.
    pub created: Vec<FileId>,
    /// Offered names refused for lacking the required extension.
    pub rejected: Vec<String>,
}
