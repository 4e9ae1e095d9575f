//! Engine configuration, navigation, and shared removal helpers.

use std::collections::HashSet;

use dataroom_core::config::WorkspaceConfig;
use dataroom_core::error::AppError;
use dataroom_core::result::AppResult;
use dataroom_core::types::{FileId, FolderId, RoomId};
use dataroom_entity::Snapshot;
use tracing::debug;

use super::outcome::Applied;
use crate::hierarchy::Hierarchy;
use crate::naming::{NamingPolicy, normalize_name};

/// Pure, synchronous state transitions over [`Snapshot`]s.
#[derive(Debug, Clone)]
pub struct MutationEngine {
    /// File naming rules.
    pub(crate) policy: NamingPolicy,
    /// Name of the root folder created with each room.
    pub(crate) root_folder_name: String,
}

impl MutationEngine {
    /// Create an engine with explicit naming rules.
    pub fn new(policy: NamingPolicy, root_folder_name: impl Into<String>) -> Self {
        Self {
            policy,
            root_folder_name: root_folder_name.into(),
        }
    }

    /// Create an engine from workspace configuration.
    pub fn from_config(config: &WorkspaceConfig) -> Self {
        Self::new(
            NamingPolicy::from_config(config),
            config.root_folder_name.clone(),
        )
    }

    /// The file naming rules in use.
    pub fn policy(&self) -> &NamingPolicy {
        &self.policy
    }

    /// Activate a room and its root folder.
    pub fn select_room(&self, snapshot: &Snapshot, room_id: RoomId) -> AppResult<Applied<()>> {
        let root = Hierarchy::new(snapshot).room(room_id)?.root_folder_id;
        let mut next = snapshot.clone();
        next.active_room_id = Some(room_id);
        next.active_folder_id = Some(root);
        Ok(Applied::new(next, ()))
    }

    /// Activate a folder and the room it belongs to.
    pub fn select_folder(&self, snapshot: &Snapshot, folder_id: FolderId) -> AppResult<Applied<()>> {
        let room = Hierarchy::new(snapshot).folder(folder_id)?.room_id;
        let mut next = snapshot.clone();
        next.active_room_id = Some(room);
        next.active_folder_id = Some(folder_id);
        Ok(Applied::new(next, ()))
    }
}

impl Default for MutationEngine {
    fn default() -> Self {
        Self::from_config(&WorkspaceConfig::default())
    }
}

/// Normalize a user-supplied name, rejecting one that ends up empty.
pub(crate) fn required_name(raw: &str, what: &str) -> AppResult<String> {
    let name = normalize_name(raw);
    if name.is_empty() {
        return Err(AppError::validation(format!("{what} name cannot be empty")));
    }
    Ok(name)
}

/// Remove folders and files from `next` and scrub every surviving folder's
/// child lists of the removed ids.
pub(crate) fn remove_entities(
    next: &mut Snapshot,
    folders: &HashSet<FolderId>,
    files: &HashSet<FileId>,
) {
    next.folders.retain(|id, _| !folders.contains(id));
    next.files.retain(|id, _| !files.contains(id));
    for folder in next.folders.values_mut() {
        folder.child_folder_ids.retain(|id| !folders.contains(id));
        folder.file_ids.retain(|id| !files.contains(id));
    }
}

/// Point the active ids at something that still exists after a removal.
///
/// A removed active folder falls back to its nearest surviving ancestor as
/// seen in `before`; a removed active room falls back to the first room by
/// name.
pub(crate) fn repair_active(before: &Snapshot, next: &mut Snapshot) {
    let room_alive = next
        .active_room_id
        .is_some_and(|id| next.rooms.contains_key(&id));
    if !room_alive {
        let fallback = Hierarchy::new(next)
            .first_room()
            .map(|room| (room.id, room.root_folder_id));
        next.active_room_id = fallback.map(|(room, _)| room);
        next.active_folder_id = fallback.map(|(_, root)| root);
        debug!(room_id = ?next.active_room_id, "Active room reassigned");
        return;
    }

    let Some(room_id) = next.active_room_id else {
        return;
    };
    let in_room = |id: FolderId| next.folder(id).is_some_and(|f| f.room_id == room_id);
    let repaired = next
        .active_folder_id
        .and_then(|active| Hierarchy::new(before).nearest_ancestor(active, in_room))
        .or_else(|| next.room(room_id).map(|room| room.root_folder_id));

    if repaired != next.active_folder_id {
        debug!(folder_id = ?repaired, "Active folder reassigned");
        next.active_folder_id = repaired;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{add_room, fixture};
    use dataroom_core::error::ErrorKind;

    #[test]
    fn test_select_room_points_at_root() {
        let mut fx = fixture();
        let (other, other_root) = add_room(&mut fx.snapshot, "Beta");
        let engine = MutationEngine::default();
        let applied = engine.select_room(&fx.snapshot, other).unwrap();
        assert_eq!(applied.snapshot.active_room_id, Some(other));
        assert_eq!(applied.snapshot.active_folder_id, Some(other_root));
        assert_eq!(fx.snapshot.active_room_id, Some(fx.room));
    }

    #[test]
    fn test_select_folder_sets_room() {
        let mut fx = fixture();
        add_room(&mut fx.snapshot, "Beta");
        let engine = MutationEngine::default();
        let applied = engine.select_folder(&fx.snapshot, fx.b).unwrap();
        assert_eq!(applied.snapshot.active_folder_id, Some(fx.b));
        assert_eq!(applied.snapshot.active_room_id, Some(fx.room));

        let err = engine.select_folder(&fx.snapshot, FolderId::new()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_required_name() {
        assert_eq!(required_name("  Q1  plan ", "Folder").unwrap(), "Q1 plan");
        let err = required_name("   ", "Folder").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "Folder name cannot be empty");
    }

    #[test]
    fn test_repair_active_walks_to_surviving_ancestor() {
        let fx = fixture();
        let mut before = fx.snapshot.clone();
        before.active_folder_id = Some(fx.b);
        let mut next = before.clone();
        remove_entities(&mut next, &HashSet::from([fx.a, fx.b]), &HashSet::from([fx.x]));
        repair_active(&before, &mut next);
        assert_eq!(next.active_folder_id, Some(fx.root));
        assert!(next.folder(fx.root).is_some_and(|r| r.child_folder_ids.is_empty()));
    }
}
