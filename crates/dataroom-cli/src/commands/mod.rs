//! CLI command definitions and dispatch.

pub mod check;
pub mod file;
pub mod folder;
pub mod items;
pub mod room;

use clap::{Parser, Subcommand};
use dataroom_core::config::AppConfig;
use dataroom_core::error::AppError;

use crate::output::OutputFormat;
use crate::state::LocalWorkspace;

/// Data room: rooms, folders and documents from the command line
#[derive(Debug, Parser)]
#[command(name = "dataroom", version, about, long_about = None)]
pub struct Cli {
    /// Path to an additional configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Room management
    Room(room::RoomArgs),
    /// Folder management
    Folder(folder::FolderArgs),
    /// File management
    File(file::FileArgs),
    /// Move folders and files into a folder
    Move(items::MoveArgs),
    /// Delete several folders and files at once
    Rm(items::RmArgs),
    /// Verify the structure of the stored workspace
    Check,
}

impl Cli {
    /// Execute the CLI command against the stored workspace
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        let mut workspace = LocalWorkspace::open(config).await?;
        let changed = match &self.command {
            Commands::Room(args) => room::execute(args, &mut workspace, self.format).await?,
            Commands::Folder(args) => folder::execute(args, &mut workspace, self.format).await?,
            Commands::File(args) => file::execute(args, &mut workspace, self.format).await?,
            Commands::Move(args) => items::execute_move(args, &mut workspace, self.format).await?,
            Commands::Rm(args) => items::execute_rm(args, &mut workspace, self.format).await?,
            Commands::Check => check::execute(&workspace, self.format)?,
        };
        if changed {
            workspace.save().await?;
        }
        Ok(())
    }
}

/// Whether a command modified the workspace and it must be saved.
pub type Changed = bool;
