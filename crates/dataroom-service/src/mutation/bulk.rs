//! Multi-select delete.

use dataroom_core::result::AppResult;
use dataroom_core::types::{FileId, FolderId};
use dataroom_entity::Snapshot;
use tracing::{info, warn};

use super::engine::{MutationEngine, remove_entities, repair_active};
use super::outcome::{Applied, DeleteOutcome};
use crate::hierarchy::Hierarchy;

impl MutationEngine {
    /// Delete selected folders and files in one pass.
    ///
    /// Room roots are refused and reported in the outcome. Each remaining
    /// folder takes its whole subtree and contained files with it. Unknown
    /// ids are ignored.
    pub fn bulk_delete(
        &self,
        snapshot: &Snapshot,
        folder_ids: &[FolderId],
        file_ids: &[FileId],
    ) -> AppResult<Applied<DeleteOutcome>> {
        let hierarchy = Hierarchy::new(snapshot);
        let mut rejected_root_ids = Vec::new();
        let mut doomed = Vec::with_capacity(folder_ids.len());
        for &id in folder_ids {
            let Some(folder) = snapshot.folder(id) else {
                continue;
            };
            if folder.is_root() || snapshot.is_room_root(id) {
                if !rejected_root_ids.contains(&id) {
                    rejected_root_ids.push(id);
                }
                continue;
            }
            doomed.push(id);
        }
        if !rejected_root_ids.is_empty() {
            warn!(count = rejected_root_ids.len(), "Room roots refused in bulk delete");
        }

        let (folders, mut files) = hierarchy.file_cascade(doomed);
        files.extend(file_ids.iter().copied().filter(|id| snapshot.files.contains_key(id)));

        let mut next = snapshot.clone();
        remove_entities(&mut next, &folders, &files);
        repair_active(snapshot, &mut next);

        info!(
            folders = folders.len(),
            files = files.len(),
            rejected = rejected_root_ids.len(),
            "Bulk delete applied"
        );

        Ok(Applied::new(
            next,
            DeleteOutcome {
                removed_folder_ids: folders,
                removed_file_ids: files,
                rejected_root_ids,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::verify_invariants;
    use crate::testing::{add_room, fixture};
    use std::collections::HashSet;

    #[test]
    fn test_bulk_delete_removes_exact_union() {
        let engine = MutationEngine::default();
        let fx = fixture();

        let applied = engine.bulk_delete(&fx.snapshot, &[fx.a], &[fx.y]).unwrap();
        let (next, outcome) = applied.into_parts();
        assert_eq!(outcome.removed_folder_ids, HashSet::from([fx.a, fx.b]));
        assert_eq!(outcome.removed_file_ids, HashSet::from([fx.x, fx.y]));
        assert!(outcome.rejected_root_ids.is_empty());

        assert_eq!(next.folders.len(), 1);
        assert!(next.files.is_empty());
        for folder in next.folders.values() {
            assert!(!folder.child_folder_ids.iter().any(|id| *id == fx.a || *id == fx.b));
            assert!(!folder.file_ids.iter().any(|id| *id == fx.x || *id == fx.y));
        }
        assert!(verify_invariants(&next, engine.policy()).is_ok());
    }

    #[test]
    fn test_bulk_delete_reports_roots() {
        let engine = MutationEngine::default();
        let mut fx = fixture();
        let (_, other_root) = add_room(&mut fx.snapshot, "Other");

        let applied = engine
            .bulk_delete(&fx.snapshot, &[fx.root, other_root, fx.b, FolderId::new()], &[])
            .unwrap();
        assert_eq!(applied.output.rejected_root_ids, vec![fx.root, other_root]);
        assert_eq!(applied.output.removed_folder_ids, HashSet::from([fx.b]));
        assert!(applied.snapshot.folder(fx.root).is_some());
        assert!(applied.snapshot.folder(other_root).is_some());
    }

    #[test]
    fn test_bulk_delete_nested_selection_and_active_repair() {
        let engine = MutationEngine::default();
        let mut fx = fixture();
        fx.snapshot.active_folder_id = Some(fx.b);

        let applied = engine
            .bulk_delete(&fx.snapshot, &[fx.b, fx.a], &[fx.x, FileId::new()])
            .unwrap();
        assert_eq!(applied.output.removed_file_ids, HashSet::from([fx.x]));
        assert_eq!(applied.snapshot.active_folder_id, Some(fx.root));
        assert!(!applied.output.is_empty());
    }

    #[test]
    fn test_bulk_delete_nothing() {
        let engine = MutationEngine::default();
        let fx = fixture();
        let applied = engine.bulk_delete(&fx.snapshot, &[], &[]).unwrap();
        assert!(applied.output.is_empty());
        assert_eq!(applied.snapshot, fx.snapshot);
    }
}
