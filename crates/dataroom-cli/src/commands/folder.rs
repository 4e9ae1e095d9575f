//! Folder management CLI commands.

use clap::{Args, Subcommand, ValueEnum};
use dataroom_core::error::AppError;
use dataroom_core::types::{FolderId, SortDirection, SortKey};
use dataroom_service::Hierarchy;
use serde::Serialize;
use tabled::Tabled;

use super::Changed;
use crate::output::{self, OutputFormat};
use crate::state::LocalWorkspace;

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// Create a folder
    Create {
        /// Folder name; made unique among its siblings
        name: String,
        /// Parent folder ID (defaults to the active folder)
        #[arg(short, long)]
        parent: Option<FolderId>,
    },
    /// Rename a folder
    Rename {
        /// Folder ID
        id: FolderId,
        /// New name
        name: String,
    },
    /// Delete a folder with everything below it
    Delete {
        /// Folder ID
        id: FolderId,
    },
    /// Show the folder tree
    Tree {
        /// Folder to start from (defaults to the active room's root)
        #[arg(long)]
        folder: Option<FolderId>,
    },
    /// List the contents of a folder
    Ls {
        /// Folder ID (defaults to the active folder)
        #[arg(long)]
        folder: Option<FolderId>,
        /// Order files by
        #[arg(short, long, value_enum, default_value = "name")]
        sort: SortArg,
        /// Reverse the order
        #[arg(long)]
        desc: bool,
    },
    /// Make a folder active (and its room)
    Select {
        /// Folder ID
        id: FolderId,
    },
}

/// File ordering accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    /// Case-insensitive name
    Name,
    /// Creation time
    Created,
    /// Size in bytes
    Size,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortKey::Name,
            SortArg::Created => SortKey::CreatedAt,
            SortArg::Size => SortKey::Size,
        }
    }
}

/// Folder listing row
#[derive(Debug, Serialize, Tabled)]
struct EntryRow {
    /// Folder or file
    kind: String,
    /// ID
    id: String,
    /// Name
    name: String,
    /// Size in bytes, or item count for folders
    size: String,
    /// Created at
    created_at: String,
    /// Whether cached content is available
    cached: String,
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    workspace: &mut LocalWorkspace,
    format: OutputFormat,
) -> Result<Changed, AppError> {
    match &args.command {
        FolderCommand::Create { name, parent } => {
            let parent_id = workspace.folder_or_active(*parent)?;
            let id = workspace.coordinator.create_folder(parent_id, name).await?;
            let snapshot = workspace.coordinator.snapshot();
            let final_name = snapshot.folder(id).map(|f| f.name.clone()).unwrap_or_default();
            output::print_success(&format!("Folder '{final_name}' created (id: {id})"));
            Ok(true)
        }
        FolderCommand::Rename { id, name } => {
            workspace.coordinator.rename_folder(*id, name).await?;
            let snapshot = workspace.coordinator.snapshot();
            let final_name = snapshot.folder(*id).map(|f| f.name.clone()).unwrap_or_default();
            output::print_success(&format!("Folder {id} renamed to '{final_name}'"));
            Ok(true)
        }
        FolderCommand::Delete { id } => {
            let outcome = workspace.coordinator.delete_folder(*id).await?;
            output::print_success(&format!(
                "Deleted {} folders and {} files",
                outcome.removed_folder_ids.len(),
                outcome.removed_file_ids.len()
            ));
            Ok(true)
        }
        FolderCommand::Tree { folder } => {
            let snapshot = workspace.coordinator.snapshot();
            let hierarchy = Hierarchy::new(&snapshot);
            let start = match folder {
                Some(id) => *id,
                None => {
                    let room_id = workspace.room_or_active(None)?;
                    hierarchy.room(room_id)?.root_folder_id
                }
            };
            let tree = hierarchy.folder_tree(start)?;
            output::print_tree(&tree, format);
            Ok(false)
        }
        FolderCommand::Ls { folder, sort, desc } => {
            let folder_id = workspace.folder_or_active(*folder)?;
            let snapshot = workspace.coordinator.snapshot();
            let hierarchy = Hierarchy::new(&snapshot);
            let path = hierarchy.path_to_root(folder_id)?;
            let direction = if *desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };

            let mut rows: Vec<EntryRow> = hierarchy
                .sorted_child_folders(folder_id)
                .into_iter()
                .map(|child| EntryRow {
                    kind: "folder".to_string(),
                    id: child.id.to_string(),
                    name: format!("{}/", child.name),
                    size: format!("{} items", child.child_count()),
                    created_at: child.created_at.format("%Y-%m-%d %H:%M").to_string(),
                    cached: String::new(),
                })
                .collect();
            rows.extend(
                hierarchy
                    .sorted_files_by(folder_id, (*sort).into(), direction)
                    .into_iter()
                    .map(|file| EntryRow {
                        kind: "file".to_string(),
                        id: file.id.to_string(),
                        name: file.name.clone(),
                        size: file.size_bytes.to_string(),
                        created_at: file.created_at.format("%Y-%m-%d %H:%M").to_string(),
                        cached: if file.is_hydrated() { "yes" } else { "no" }.to_string(),
                    }),
            );

            if format == OutputFormat::Table {
                let breadcrumbs: Vec<&str> = path.iter().map(|f| f.name.as_str()).collect();
                println!("/{}", breadcrumbs.join("/"));
            }
            output::print_list(&rows, format);
            Ok(false)
        }
        FolderCommand::Select { id } => {
            workspace.coordinator.select_folder(*id).await?;
            output::print_success(&format!("Folder {id} is now active"));
            Ok(true)
        }
    }
}
