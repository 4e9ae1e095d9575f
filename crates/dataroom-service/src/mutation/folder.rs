//! Folder create, rename and cascading delete.

use dataroom_core::error::AppError;
use dataroom_core::result::AppResult;
use dataroom_core::types::FolderId;
use dataroom_entity::{Folder, Snapshot};
use tracing::info;

use super::engine::{MutationEngine, remove_entities, repair_active, required_name};
use super::outcome::{Applied, DeleteOutcome};
use crate::hierarchy::{Hierarchy, ItemId};
use crate::naming::unique_folder_name;

impl MutationEngine {
    /// Create a folder under `parent_id`, uniquifying the name against the
    /// parent's current children.
    pub fn create_folder(
        &self,
        snapshot: &Snapshot,
        parent_id: FolderId,
        name: &str,
    ) -> AppResult<Applied<FolderId>> {
        let hierarchy = Hierarchy::new(snapshot);
        let parent = hierarchy.folder(parent_id)?;
        let name = required_name(name, "Folder")?;
        let name = unique_folder_name(&name, &hierarchy.sibling_names(parent_id, None));

        let folder = Folder::new(name, Some(parent_id), parent.room_id);
        let folder_id = folder.id;
        info!(folder_id = %folder_id, parent_id = %parent_id, name = %folder.name, "Folder created");

        let mut next = snapshot.clone();
        next.folders.insert(folder_id, folder);
        if let Some(parent) = next.folders.get_mut(&parent_id) {
            parent.attach_folder(folder_id);
        }
        Ok(Applied::new(next, folder_id))
    }

    /// Rename a folder in place.
    pub fn rename_folder(
        &self,
        snapshot: &Snapshot,
        folder_id: FolderId,
        name: &str,
    ) -> AppResult<Applied<()>> {
        let hierarchy = Hierarchy::new(snapshot);
        let folder = hierarchy.folder(folder_id)?;
        let name = required_name(name, "Folder")?;

        if let Some(parent_id) = folder.parent_id {
            let siblings = hierarchy.sibling_names(parent_id, Some(ItemId::Folder(folder_id)));
            if siblings.contains(&name.to_lowercase()) {
                return Err(AppError::validation(format!(
                    "An item named '{name}' already exists in this folder"
                )));
            }
        }

        let mut next = snapshot.clone();
        if let Some(folder) = next.folders.get_mut(&folder_id) {
            folder.name = name;
        }
        info!(folder_id = %folder_id, "Folder renamed");
        Ok(Applied::new(next, ()))
    }

    /// Delete a folder with its whole subtree.
    ///
    /// Room roots cannot be deleted. An active folder inside the subtree
    /// moves to the nearest surviving ancestor.
    pub fn delete_folder(
        &self,
        snapshot: &Snapshot,
        folder_id: FolderId,
    ) -> AppResult<Applied<DeleteOutcome>> {
        let hierarchy = Hierarchy::new(snapshot);
        let folder = hierarchy.folder(folder_id)?;
        if folder.is_root() || snapshot.is_room_root(folder_id) {
            return Err(AppError::forbidden("The root folder of a room cannot be deleted"));
        }

        let (folders, files) = hierarchy.file_cascade([folder_id]);

        let mut next = snapshot.clone();
        remove_entities(&mut next, &folders, &files);
        repair_active(snapshot, &mut next);

        info!(
            folder_id = %folder_id,
            folders = folders.len(),
            files = files.len(),
            "Folder deleted"
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::verify_invariants;
    use crate::testing::fixture;
    use dataroom_core::error::ErrorKind;
    use std::collections::HashSet;

    #[test]
    fn test_create_folder_uniquifies_among_siblings() {
        let engine = MutationEngine::default();
        let fx = fixture();

        let first = engine.create_folder(&fx.snapshot, fx.root, "a").unwrap();
        let created = first.snapshot.folder(first.output).unwrap();
        assert_eq!(created.name, "a (1)");
        assert_eq!(created.room_id, fx.room);
        assert!(first.snapshot.folder(fx.root).unwrap().child_folder_ids.contains(&first.output));

        // Same name under a different parent is fine.
        let second = engine.create_folder(&fx.snapshot, fx.b, "A").unwrap();
        assert_eq!(second.snapshot.folder(second.output).unwrap().name, "A");
        assert!(verify_invariants(&second.snapshot, engine.policy()).is_ok());
    }

    #[test]
    fn test_create_folder_errors() {
        let engine = MutationEngine::default();
        let fx = fixture();
        let err = engine.create_folder(&fx.snapshot, FolderId::new(), "x").unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        let err = engine.create_folder(&fx.snapshot, fx.root, " \t ").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_rename_folder() {
        let engine = MutationEngine::default();
        let fx = fixture();

        let err = engine.rename_folder(&fx.snapshot, fx.a, "y.PDF").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        // Case change of itself is allowed.
        let applied = engine.rename_folder(&fx.snapshot, fx.a, "  a ").unwrap();
        assert_eq!(applied.snapshot.folder(fx.a).unwrap().name, "a");
        assert_eq!(fx.snapshot.folder(fx.a).unwrap().name, "A");

        let applied = engine.rename_folder(&fx.snapshot, fx.root, "Everything").unwrap();
        assert_eq!(applied.snapshot.folder(fx.root).unwrap().name, "Everything");
    }

    #[test]
    fn test_delete_root_is_forbidden() {
        let engine = MutationEngine::default();
        let fx = fixture();
        let err = engine.delete_folder(&fx.snapshot, fx.root).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[test]
    fn test_delete_folder_cascades_and_repairs_active() {
        let engine = MutationEngine::default();
        let mut fx = fixture();
        fx.snapshot.active_folder_id = Some(fx.b);

        let applied = engine.delete_folder(&fx.snapshot, fx.a).unwrap();
        let next = &applied.snapshot;
        assert_eq!(applied.output.removed_folder_ids, HashSet::from([fx.a, fx.b]));
        assert_eq!(applied.output.removed_file_ids, HashSet::from([fx.x]));
        assert!(next.folder(fx.a).is_none());
        assert!(next.file(fx.x).is_none());
        assert!(next.file(fx.y).is_some());
        assert_eq!(next.active_folder_id, Some(fx.root));
        assert!(verify_invariants(next, engine.policy()).is_ok());
    }

    #[test]
    fn test_delete_leaf_keeps_unrelated_active() {
        let engine = MutationEngine::default();
        let mut fx = fixture();
        fx.snapshot.active_folder_id = Some(fx.a);
        let applied = engine.delete_folder(&fx.snapshot, fx.b).unwrap();
        assert_eq!(applied.snapshot.active_folder_id, Some(fx.a));
        assert!(applied.snapshot.folder(fx.a).unwrap().child_folder_ids.is_empty());
    }
}
