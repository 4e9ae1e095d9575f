//! Multi-item move and delete commands.

use clap::Args;
use dataroom_core::error::AppError;
use dataroom_core::types::{FileId, FolderId};
use dataroom_service::hierarchy::ItemId;
use dataroom_service::{DragPayload, Hierarchy, Selection};

use super::Changed;
use crate::output::{self, OutputFormat};
use crate::state::LocalWorkspace;

/// Arguments for the move command
#[derive(Debug, Args)]
pub struct MoveArgs {
    /// Target folder ID
    #[arg(long)]
    pub to: FolderId,
    /// Folders to move
    #[arg(long = "folder")]
    pub folders: Vec<FolderId>,
    /// Files to move
    #[arg(long = "file")]
    pub files: Vec<FileId>,
    /// A drag payload as JSON: {"folderIds": [...], "fileIds": [...]}
    #[arg(long, conflicts_with_all = ["folders", "files"])]
    pub payload: Option<String>,
}

/// Arguments for the rm command
#[derive(Debug, Args)]
pub struct RmArgs {
    /// Folders to delete
    #[arg(long = "folder")]
    pub folders: Vec<FolderId>,
    /// Files to delete
    #[arg(long = "file")]
    pub files: Vec<FileId>,
    /// Delete everything listed in a folder instead (the active folder by default)
    #[arg(long, conflicts_with_all = ["folders", "files"])]
    pub all: bool,
    /// Folder whose contents `--all` deletes
    #[arg(long = "in", requires = "all")]
    pub within: Option<FolderId>,
}

/// Execute the move command
pub async fn execute_move(
    args: &MoveArgs,
    workspace: &mut LocalWorkspace,
    format: OutputFormat,
) -> Result<Changed, AppError> {
    let payload = match &args.payload {
        Some(raw) => DragPayload::parse(raw)
            .ok_or_else(|| AppError::validation("Malformed drag payload"))?,
        None => DragPayload::new(args.folders.clone(), args.files.clone()),
    };
    if payload.is_empty() {
        return Err(AppError::validation("Nothing to move"));
    }

    let outcome = workspace.coordinator.drop_payload(args.to, &payload).await?;
    match format {
        OutputFormat::Json => output::print_item(&outcome, format),
        OutputFormat::Table => {
            output::print_success(&format!("Moved {} items into {}", outcome.moved, args.to));
            if outcome.skipped > 0 {
                output::print_warning(&format!(
                    "Skipped {} items: a room root or a folder cannot move into itself",
                    outcome.skipped
                ));
            }
        }
    }
    Ok(outcome.moved > 0)
}

/// Execute the rm command
pub async fn execute_rm(
    args: &RmArgs,
    workspace: &mut LocalWorkspace,
    format: OutputFormat,
) -> Result<Changed, AppError> {
    let mut selection = Selection::new();
    if args.all {
        let folder_id = workspace.folder_or_active(args.within)?;
        let snapshot = workspace.coordinator.snapshot();
        let hierarchy = Hierarchy::new(&snapshot);
        hierarchy.folder(folder_id)?;
        selection.select_all_visible(&hierarchy.children_matching(folder_id, |_| true));
    } else {
        let items = args
            .folders
            .iter()
            .map(|id| ItemId::Folder(*id))
            .chain(args.files.iter().map(|id| ItemId::File(*id)));
        for item in items {
            if !selection.contains(item) {
                selection.toggle(item);
            }
        }
    }
    if selection.is_empty() {
        return Err(AppError::validation("Nothing to delete"));
    }

    let folder_ids: Vec<FolderId> = selection.folder_ids().collect();
    let file_ids: Vec<FileId> = selection.file_ids().collect();
    let outcome = workspace.coordinator.bulk_delete(&folder_ids, &file_ids).await?;

    match format {
        OutputFormat::Json => output::print_item(&outcome, format),
        OutputFormat::Table => {
            output::print_success(&format!(
                "Deleted {} folders and {} files",
                outcome.removed_folder_ids.len(),
                outcome.removed_file_ids.len()
            ));
            for root in &outcome.rejected_root_ids {
                output::print_warning(&format!("Folder {root} is a room root and was kept"));
            }
        }
    }
    Ok(!outcome.is_empty())
}
