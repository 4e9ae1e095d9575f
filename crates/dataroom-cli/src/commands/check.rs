//! Structural check of the stored workspace.

use dataroom_core::error::AppError;
use dataroom_service::hierarchy::verify_invariants;
use serde::Serialize;

use super::Changed;
use crate::output::{self, OutputFormat};
use crate::state::LocalWorkspace;

#[derive(Debug, Serialize)]
struct CheckReport {
    rooms: usize,
    folders: usize,
    files: usize,
    violations: Vec<String>,
}

/// Execute the check command
pub fn execute(workspace: &LocalWorkspace, format: OutputFormat) -> Result<Changed, AppError> {
    let snapshot = workspace.coordinator.snapshot();
    let violations: Vec<String> =
        match verify_invariants(&snapshot, workspace.coordinator.engine().policy()) {
            Ok(()) => Vec::new(),
            Err(found) => found.iter().map(ToString::to_string).collect(),
        };

    let report = CheckReport {
        rooms: snapshot.rooms.len(),
        folders: snapshot.folders.len(),
        files: snapshot.files.len(),
        violations,
    };

    match format {
        OutputFormat::Json => output::print_item(&report, format),
        OutputFormat::Table => {
            output::print_kv("State file", &workspace.state_path().display().to_string());
            output::print_kv("Rooms", &report.rooms.to_string());
            output::print_kv("Folders", &report.folders.to_string());
            output::print_kv("Files", &report.files.to_string());
            for violation in &report.violations {
                output::print_error(violation);
            }
        }
    }

    if report.violations.is_empty() {
        if format == OutputFormat::Table {
            output::print_success("Workspace structure is consistent");
        }
        Ok(false)
    } else {
        Err(AppError::validation(format!(
            "{} structural problems found",
            report.violations.len()
        )))
    }
}
