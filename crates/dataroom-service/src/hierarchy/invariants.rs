//! Structural checks over a whole snapshot.

use std::collections::{HashMap, HashSet};
use std::fmt;

use dataroom_core::types::{FileId, FolderId, RoomId};
use dataroom_entity::Snapshot;

use crate::naming::NamingPolicy;

/// One broken rule found in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A room does not have exactly one parentless folder, or its root
    /// pointer names a missing or non-root folder.
    RootMismatch {
        /// The room.
        room_id: RoomId,
        /// Parentless folders found for the room.
        roots: usize,
    },
    /// A parentless folder belongs to no room.
    OrphanRoot {
        /// The folder.
        folder_id: FolderId,
    },
    /// A folder is its own ancestor.
    Cycle {
        /// A folder on the cycle.
        folder_id: FolderId,
    },
    /// A folder's child lists disagree with its children's parent pointers.
    ChildMismatch {
        /// The parent folder.
        folder_id: FolderId,
    },
    /// A parent pointer names a folder that does not exist.
    DanglingParent {
        /// The child folder or file, as text.
        child: String,
    },
    /// A child's room differs from its parent's room.
    RoomMismatch {
        /// The child folder or file, as text.
        child: String,
    },
    /// Two children of one folder share a case-insensitive name.
    DuplicateName {
        /// The parent folder.
        folder_id: FolderId,
        /// The shared lowercase name.
        name: String,
    },
    /// A file name lacks the required extension.
    MissingExtension {
        /// The file.
        file_id: FileId,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootMismatch { room_id, roots } => {
                write!(f, "room {room_id} has {roots} root folders or a bad root pointer")
            }
            Self::OrphanRoot { folder_id } => write!(f, "root folder {folder_id} has no room"),
            Self::Cycle { folder_id } => write!(f, "folder {folder_id} is its own ancestor"),
            Self::ChildMismatch { folder_id } => {
                write!(f, "child lists of folder {folder_id} disagree with parent pointers")
            }
            Self::DanglingParent { child } => write!(f, "{child} points at a missing parent"),
            Self::RoomMismatch { child } => write!(f, "{child} is in a different room than its parent"),
            Self::DuplicateName { folder_id, name } => {
                write!(f, "folder {folder_id} has more than one child named '{name}'")
            }
            Self::MissingExtension { file_id } => {
                write!(f, "file {file_id} lacks the required extension")
            }
        }
    }
}

/// Check every structural rule of the workspace model.
///
/// Returns all violations found, not just the first.
pub fn verify_invariants(
    snapshot: &Snapshot,
    policy: &NamingPolicy,
) -> Result<(), Vec<InvariantViolation>> {
    let mut violations = Vec::new();

    check_roots(snapshot, &mut violations);
    check_acyclic(snapshot, &mut violations);
    check_symmetry(snapshot, &mut violations);
    check_names(snapshot, policy, &mut violations);

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn check_roots(snapshot: &Snapshot, violations: &mut Vec<InvariantViolation>) {
    let mut roots_per_room: HashMap<RoomId, usize> = HashMap::new();
    for folder in snapshot.folders.values().filter(|f| f.is_root()) {
        if snapshot.room(folder.room_id).is_none() {
            violations.push(InvariantViolation::OrphanRoot {
                folder_id: folder.id,
            });
        }
        *roots_per_room.entry(folder.room_id).or_default() += 1;
    }

    for room in snapshot.rooms.values() {
        let roots = roots_per_room.get(&room.id).copied().unwrap_or(0);
        let pointer_ok = snapshot
            .folder(room.root_folder_id)
            .is_some_and(|root| root.is_root() && root.room_id == room.id);
        if roots != 1 || !pointer_ok {
            violations.push(InvariantViolation::RootMismatch {
                room_id: room.id,
                roots,
            });
        }
    }
}

fn check_acyclic(snapshot: &Snapshot, violations: &mut Vec<InvariantViolation>) {
    let mut reported: HashSet<FolderId> = HashSet::new();
    for folder in snapshot.folders.values() {
        let mut seen = HashSet::from([folder.id]);
        let mut current = folder.parent_id;
        while let Some(parent_id) = current {
            if parent_id == folder.id {
                if reported.insert(folder.id) {
                    violations.push(InvariantViolation::Cycle {
                        folder_id: folder.id,
                    });
                }
                break;
            }
            if !seen.insert(parent_id) {
                break;
            }
            current = snapshot.folder(parent_id).and_then(|f| f.parent_id);
        }
    }
}

fn check_symmetry(snapshot: &Snapshot, violations: &mut Vec<InvariantViolation>) {
    let mut folders_by_parent: HashMap<FolderId, HashSet<FolderId>> = HashMap::new();
    for folder in snapshot.folders.values() {
        let Some(parent_id) = folder.parent_id else {
            continue;
        };
        match snapshot.folder(parent_id) {
            Some(parent) => {
                if parent.room_id != folder.room_id {
                    violations.push(InvariantViolation::RoomMismatch {
                        child: format!("folder {}", folder.id),
                    });
                }
                folders_by_parent.entry(parent_id).or_default().insert(folder.id);
            }
            None => violations.push(InvariantViolation::DanglingParent {
                child: format!("folder {}", folder.id),
            }),
        }
    }

    let mut files_by_parent: HashMap<FolderId, HashSet<FileId>> = HashMap::new();
    for file in snapshot.files.values() {
        match snapshot.folder(file.parent_folder_id) {
            Some(parent) => {
                if parent.room_id != file.room_id {
                    violations.push(InvariantViolation::RoomMismatch {
                        child: format!("file {}", file.id),
                    });
                }
                files_by_parent
                    .entry(file.parent_folder_id)
                    .or_default()
                    .insert(file.id);
            }
            None => violations.push(InvariantViolation::DanglingParent {
                child: format!("file {}", file.id),
            }),
        }
    }

    for folder in snapshot.folders.values() {
        let listed_folders: HashSet<FolderId> = folder.child_folder_ids.iter().copied().collect();
        let listed_files: HashSet<FileId> = folder.file_ids.iter().copied().collect();
        let has_duplicates = listed_folders.len() != folder.child_folder_ids.len()
            || listed_files.len() != folder.file_ids.len();

        let pointed_folders = folders_by_parent.remove(&folder.id).unwrap_or_default();
        let pointed_files = files_by_parent.remove(&folder.id).unwrap_or_default();

        if has_duplicates || listed_folders != pointed_folders || listed_files != pointed_files {
            violations.push(InvariantViolation::ChildMismatch {
                folder_id: folder.id,
            });
        }
    }
}

fn check_names(
    snapshot: &Snapshot,
    policy: &NamingPolicy,
    violations: &mut Vec<InvariantViolation>,
) {
    let mut names: HashMap<FolderId, HashSet<String>> = HashMap::new();
    let mut duplicates: HashSet<(FolderId, String)> = HashSet::new();

    let children = snapshot
        .folders
        .values()
        .filter_map(|f| f.parent_id.map(|p| (p, f.name.to_lowercase())))
        .chain(
            snapshot
                .files
                .values()
                .map(|f| (f.parent_folder_id, f.name.to_lowercase())),
        );
    for (parent, name) in children {
        if !names.entry(parent).or_default().insert(name.clone()) {
            duplicates.insert((parent, name));
        }
    }

    let mut duplicates: Vec<_> = duplicates.into_iter().collect();
    duplicates.sort();
    violations.extend(
        duplicates
            .into_iter()
            .map(|(folder_id, name)| InvariantViolation::DuplicateName { folder_id, name }),
    );

    violations.extend(
        snapshot
            .files
            .values()
            .filter(|file| !policy.accepts(&file.name))
            .map(|file| InvariantViolation::MissingExtension { file_id: file.id }),
    );
}
