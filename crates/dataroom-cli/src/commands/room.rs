//! Room management CLI commands.

use clap::{Args, Subcommand};
use dataroom_core::error::AppError;
use dataroom_core::types::RoomId;
use dataroom_service::Hierarchy;
use serde::Serialize;
use tabled::Tabled;

use super::Changed;
use crate::output::{self, OutputFormat};
use crate::state::LocalWorkspace;

/// Arguments for room commands
#[derive(Debug, Args)]
pub struct RoomArgs {
    /// Room subcommand
    #[command(subcommand)]
    pub command: RoomCommand,
}

/// Room subcommands
#[derive(Debug, Subcommand)]
pub enum RoomCommand {
    /// Create a room and make it active
    Create {
        /// Room name; made unique if taken
        name: String,
    },
    /// Rename a room
    Rename {
        /// Room ID
        id: RoomId,
        /// New name
        name: String,
    },
    /// Delete a room with all of its folders, files and cached content
    Delete {
        /// Room ID
        id: RoomId,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List rooms
    List,
    /// Make a room active
    Select {
        /// Room ID
        id: RoomId,
    },
}

/// Room display row
#[derive(Debug, Serialize, Tabled)]
struct RoomRow {
    /// Room ID
    id: String,
    /// Name
    name: String,
    /// Folders below the root
    folders: u64,
    /// Files
    files: u64,
    /// Created at
    created_at: String,
    /// Active marker
    active: String,
}

/// Execute room commands
pub async fn execute(
    args: &RoomArgs,
    workspace: &mut LocalWorkspace,
    format: OutputFormat,
) -> Result<Changed, AppError> {
    let coordinator = &mut workspace.coordinator;

    match &args.command {
        RoomCommand::Create { name } => {
            let created = coordinator.create_room(name).await?;
            let snapshot = coordinator.snapshot();
            let final_name = snapshot
                .room(created.room_id)
                .map(|room| room.name.clone())
                .unwrap_or_default();
            match format {
                OutputFormat::Json => output::print_item(&created, format),
                OutputFormat::Table => output::print_success(&format!(
                    "Room '{final_name}' created (id: {}, root: {})",
                    created.room_id, created.root_folder_id
                )),
            }
            Ok(true)
        }
        RoomCommand::Rename { id, name } => {
            coordinator.rename_room(*id, name).await?;
            output::print_success(&format!("Room {id} renamed to '{}'", name.trim()));
            Ok(true)
        }
        RoomCommand::Delete { id, yes } => {
            let (room_name, stats) = {
                let snapshot = coordinator.snapshot();
                let hierarchy = Hierarchy::new(&snapshot);
                let room = hierarchy.room(*id)?;
                (room.name.clone(), hierarchy.room_stats(*id)?)
            };

            if !yes {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Delete room '{room_name}' with {} folders and {} files?",
                        stats.folder_count, stats.file_count
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(false);
                }
            }

            let outcome = coordinator.delete_room(*id).await?;
            output::print_success(&format!(
                "Room '{room_name}' deleted ({} folders, {} files removed)",
                outcome.removed_folder_ids.len(),
                outcome.removed_file_ids.len()
            ));
            Ok(true)
        }
        RoomCommand::List => {
            let snapshot = coordinator.snapshot();
            let hierarchy = Hierarchy::new(&snapshot);
            let rows: Vec<RoomRow> = hierarchy
                .sorted_rooms()
                .into_iter()
                .map(|room| {
                    let stats = hierarchy.room_stats(room.id).unwrap_or_default();
                    RoomRow {
                        id: room.id.to_string(),
                        name: room.name.clone(),
                        folders: stats.folder_count,
                        files: stats.file_count,
                        created_at: room.created_at.format("%Y-%m-%d %H:%M").to_string(),
                        active: if snapshot.active_room_id == Some(room.id) {
                            "*".to_string()
                        } else {
                            String::new()
                        },
                    }
                })
                .collect();

            output::print_list(&rows, format);
            Ok(false)
        }
        RoomCommand::Select { id } => {
            coordinator.select_room(*id).await?;
            output::print_success(&format!("Room {id} is now active"));
            Ok(true)
        }
    }
}
