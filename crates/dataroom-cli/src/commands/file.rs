//! File management CLI commands.

use std::path::PathBuf;

use bytes::Bytes;
use clap::{Args, Subcommand};
use dataroom_core::error::{AppError, ErrorKind};
use dataroom_core::types::{FileId, FolderId};
use dataroom_service::Hierarchy;
use serde::Serialize;

use super::Changed;
use crate::output::{self, OutputFormat};
use crate::state::LocalWorkspace;

/// Arguments for file commands
#[derive(Debug, Args)]
pub struct FileArgs {
    /// File subcommand
    #[command(subcommand)]
    pub command: FileCommand,
}

/// File subcommands
#[derive(Debug, Subcommand)]
pub enum FileCommand {
    /// Upload local files into a folder
    Upload {
        /// Paths of the files to upload
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Target folder ID (defaults to the active folder)
        #[arg(long)]
        folder: Option<FolderId>,
    },
    /// Rename a file; the required extension is kept
    Rename {
        /// File ID
        id: FileId,
        /// New name
        name: String,
    },
    /// Delete a file and its cached content
    Delete {
        /// File ID
        id: FileId,
    },
    /// Show file details, optionally exporting the cached content
    Show {
        /// File ID
        id: FileId,
        /// Write the cached content to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// File details
#[derive(Debug, Serialize)]
struct FileDetails {
    id: String,
    name: String,
    path: String,
    size_bytes: u64,
    created_at: String,
    origin: String,
    cached: bool,
}

/// Execute file commands
pub async fn execute(
    args: &FileArgs,
    workspace: &mut LocalWorkspace,
    format: OutputFormat,
) -> Result<Changed, AppError> {
    match &args.command {
        FileCommand::Upload { paths, folder } => {
            let folder_id = workspace.folder_or_active(*folder)?;

            let mut files = Vec::with_capacity(paths.len());
            for path in paths {
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .ok_or_else(|| {
                        AppError::validation(format!("Not a file path: {}", path.display()))
                    })?
                    .to_string();
                let content = tokio::fs::read(path).await.map_err(|e| {
                    AppError::with_source(
                        ErrorKind::NotFound,
                        format!("Failed to read {}", path.display()),
                        e,
                    )
                })?;
                files.push((name, Bytes::from(content)));
            }

            let outcome = workspace.coordinator.upload_files(folder_id, files).await?;
            for rejected in &outcome.rejected {
                output::print_warning(&format!(
                    "Skipped '{rejected}': must end in {}",
                    workspace.coordinator.engine().policy().required_extension
                ));
            }
            match format {
                OutputFormat::Json => output::print_item(&outcome, format),
                OutputFormat::Table => {
                    let snapshot = workspace.coordinator.snapshot();
                    for id in &outcome.created {
                        if let Some(file) = snapshot.file(*id) {
                            output::print_success(&format!(
                                "Uploaded '{}' (id: {}, {} bytes)",
                                file.name, file.id, file.size_bytes
                            ));
                        }
                    }
                }
            }
            Ok(true)
        }
        FileCommand::Rename { id, name } => {
            workspace.coordinator.rename_file(*id, name).await?;
            let snapshot = workspace.coordinator.snapshot();
            let final_name = snapshot.file(*id).map(|f| f.name.clone()).unwrap_or_default();
            output::print_success(&format!("File {id} renamed to '{final_name}'"));
            Ok(true)
        }
        FileCommand::Delete { id } => {
            workspace.coordinator.delete_file(*id).await?;
            output::print_success(&format!("File {id} deleted"));
            Ok(true)
        }
        FileCommand::Show { id, output: export } => {
            let details = {
                let snapshot = workspace.coordinator.snapshot();
                let hierarchy = Hierarchy::new(&snapshot);
                let file = hierarchy.file(*id)?;
                let path: Vec<String> = hierarchy
                    .path_to_root(file.parent_folder_id)?
                    .iter()
                    .map(|f| f.name.clone())
                    .collect();
                FileDetails {
                    id: file.id.to_string(),
                    name: file.name.clone(),
                    path: format!("/{}/{}", path.join("/"), file.name),
                    size_bytes: file.size_bytes,
                    created_at: file.created_at.to_rfc3339(),
                    origin: file.origin.to_string(),
                    cached: file.is_hydrated(),
                }
            };
            output::print_item(&details, format);

            if let Some(target) = export {
                match workspace.coordinator.read_content(*id).await? {
                    Some(data) => {
                        tokio::fs::write(target, &data).await?;
                        output::print_success(&format!(
                            "Wrote {} bytes to {}",
                            data.len(),
                            target.display()
                        ));
                    }
                    None => output::print_warning("Content is not cached locally; upload it again"),
                }
            }
            Ok(false)
        }
    }
}
