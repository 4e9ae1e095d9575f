//! Workspace naming defaults and local state location.

use serde::{Deserialize, Serialize};

/// Workspace configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// JSON file holding the signed-out snapshot between CLI runs.
    #[serde(default = "default_state_path")]
    pub state_path: String,
    /// Name given to the root folder of every new room.
    #[serde(default = "default_root_folder_name")]
    pub root_folder_name: String,
    /// Extension every file name must carry, including the dot.
    #[serde(default = "default_required_extension")]
    pub required_extension: String,
    /// Name used when an uploaded file name normalizes to nothing.
    #[serde(default = "default_fallback_file_name")]
    pub fallback_file_name: String,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            state_path: default_state_path(),
            root_folder_name: default_root_folder_name(),
            required_extension: default_required_extension(),
            fallback_file_name: default_fallback_file_name(),
        }
    }
}

fn default_state_path() -> String {
    "data/workspace.json".to_string()
}

fn default_root_folder_name() -> String {
    "All documents".to_string()
}

fn default_required_extension() -> String {
    ".pdf".to_string()
}

fn default_fallback_file_name() -> String {
    "Untitled.pdf".to_string()
}
