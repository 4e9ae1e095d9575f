//! File record admission, rename and delete.

use std::collections::HashSet;

use dataroom_core::error::AppError;
use dataroom_core::result::AppResult;
use dataroom_core::types::{FileId, FolderId};
use dataroom_entity::{FileRecord, Snapshot};
use tracing::{debug, info};

use super::engine::{MutationEngine, remove_entities, required_name};
use super::outcome::{Applied, DeleteOutcome, FileUpload, UploadOutcome};
use crate::hierarchy::{Hierarchy, ItemId};

impl MutationEngine {
    /// Admit uploads into a folder.
    ///
    /// Offers without the required extension are rejected and reported.
    /// If nothing is admitted the call fails and no record is created.
    pub fn add_files(
        &self,
        snapshot: &Snapshot,
        folder_id: FolderId,
        uploads: &[FileUpload],
    ) -> AppResult<Applied<UploadOutcome>> {
        let hierarchy = Hierarchy::new(snapshot);
        let folder = hierarchy.folder(folder_id)?;
        let room_id = folder.room_id;

        let (admitted, rejected): (Vec<&FileUpload>, Vec<&FileUpload>) = uploads
            .iter()
            .partition(|upload| self.policy.accepts(&upload.name));
        let rejected: Vec<String> = rejected.into_iter().map(|u| u.name.clone()).collect();

        if admitted.is_empty() {
            return Err(AppError::validation(format!(
                "Only {} files are accepted ({} rejected)",
                self.policy.required_extension,
                rejected.len()
            )));
        }

        let mut used = hierarchy.sibling_names(folder_id, None);
        let mut next = snapshot.clone();
        let mut created = Vec::with_capacity(admitted.len());
        for upload in admitted {
            if next.files.contains_key(&upload.id) {
                debug!(file_id = %upload.id, "Upload id already present, skipped");
                continue;
            }
            let name = self.policy.unique_file_name(&upload.name, &used);
            used.insert(name.to_lowercase());
            let record = FileRecord::new(
                upload.id,
                name,
                folder_id,
                room_id,
                upload.size_bytes,
                upload.origin,
            );
            next.files.insert(record.id, record);
            if let Some(folder) = next.folders.get_mut(&folder_id) {
                folder.attach_file(upload.id);
            }
            created.push(upload.id);
        }

        info!(
            folder_id = %folder_id,
            created = created.len(),
            rejected = rejected.len(),
            "Files added"
        );
        Ok(Applied::new(next, UploadOutcome { created, rejected }))
    }

    /// Rename a file, appending the required extension when missing.
    pub fn rename_file(
        &self,
        snapshot: &Snapshot,
        file_id: FileId,
        name: &str,
    ) -> AppResult<Applied<()>> {
        let hierarchy = Hierarchy::new(snapshot);
        let file = hierarchy.file(file_id)?;
        let name = self.policy.ensure_extension(&required_name(name, "File")?);

        let siblings = hierarchy.sibling_names(file.parent_folder_id, Some(ItemId::File(file_id)));
        if siblings.contains(&name.to_lowercase()) {
            return Err(AppError::validation(format!(
                "An item named '{name}' already exists in this folder"
            )));
        }

        let mut next = snapshot.clone();
        if let Some(file) = next.files.get_mut(&file_id) {
            file.name = name;
        }
        info!(file_id = %file_id, "File renamed");
        Ok(Applied::new(next, ()))
    }

    /// Delete one file record.
    ///
    /// Cached content is released by whoever holds the store; the outcome
    /// names the removed id for that purpose.
    pub fn delete_file(&self, snapshot: &Snapshot, file_id: FileId) -> AppResult<Applied<DeleteOutcome>> {
        Hierarchy::new(snapshot).file(file_id)?;

        let files = HashSet::from([file_id]);
        let mut next = snapshot.clone();
        remove_entities(&mut next, &HashSet::new(), &files);
        info!(file_id = %file_id, "File deleted");

        Ok(Applied::new(
            next,
            DeleteOutcome {
                removed_folder_ids: HashSet::new(),
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

    #[test]
    fn test_add_files_uniquifies_progressively() {
        let engine = MutationEngine::default();
        let fx = fixture();
        let uploads = vec![
            FileUpload::new("Y.pdf", 10),
            FileUpload::new("y.PDF", 20),
            FileUpload::new("notes.txt", 5),
            FileUpload::new("Deck.pdf", 30),
        ];

        let applied = engine.add_files(&fx.snapshot, fx.root, &uploads).unwrap();
        let (next, outcome) = applied.into_parts();
        assert_eq!(outcome.created, vec![uploads[0].id, uploads[1].id, uploads[3].id]);
        assert_eq!(outcome.rejected, vec!["notes.txt".to_string()]);

        assert_eq!(next.file(uploads[0].id).unwrap().name, "Y (1).pdf");
        assert_eq!(next.file(uploads[1].id).unwrap().name, "y (2).PDF");
        assert_eq!(next.file(uploads[3].id).unwrap().size_bytes, 30);
        assert!(!next.file(uploads[3].id).unwrap().is_hydrated());
        assert_eq!(next.folder(fx.root).unwrap().file_ids.len(), 4);
        assert!(verify_invariants(&next, engine.policy()).is_ok());
    }

    #[test]
    fn test_add_files_all_rejected() {
        let engine = MutationEngine::default();
        let fx = fixture();
        let err = engine
            .add_files(&fx.snapshot, fx.root, &[FileUpload::new("a.docx", 1)])
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = engine
            .add_files(&fx.snapshot, FolderId::new(), &[FileUpload::new("a.pdf", 1)])
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_rename_file_appends_extension() {
        let engine = MutationEngine::default();
        let fx = fixture();
        let applied = engine.rename_file(&fx.snapshot, fx.y, " Summary ").unwrap();
        assert_eq!(applied.snapshot.file(fx.y).unwrap().name, "Summary.pdf");

        let applied = engine.rename_file(&fx.snapshot, fx.y, "y.PDF").unwrap();
        assert_eq!(applied.snapshot.file(fx.y).unwrap().name, "y.PDF");
    }

    #[test]
    fn test_rename_file_duplicate_and_empty() {
        let engine = MutationEngine::default();
        let fx = fixture();
        let mut snapshot = fx.snapshot.clone();
        let applied = engine
            .add_files(&snapshot, fx.root, &[FileUpload::new("Z.pdf", 1)])
            .unwrap();
        let z = applied.output.created[0];
        snapshot = applied.snapshot;

        let err = engine.rename_file(&snapshot, z, "y").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        let err = engine.rename_file(&snapshot, z, "").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        let err = engine.rename_file(&snapshot, FileId::new(), "q").unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_delete_file_detaches() {
        let engine = MutationEngine::default();
        let fx = fixture();
        let applied = engine.delete_file(&fx.snapshot, fx.x).unwrap();
        assert!(applied.snapshot.file(fx.x).is_none());
        assert!(applied.snapshot.folder(fx.b).unwrap().file_ids.is_empty());
        assert_eq!(applied.output.removed_file_ids, HashSet::from([fx.x]));
        assert!(engine.delete_file(&applied.snapshot, fx.x).is_err());
    }
}
