//! Folder tree structures for hierarchical display.

use dataroom_core::types::FolderId;
use serde::{Deserialize, Serialize};

/// A node in a folder tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderNode {
    /// Folder ID.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Depth below the node the tree was built from (0 for that node).
    pub depth: u32,
    /// Number of child folders.
    pub child_count: u64,
    /// Number of files directly in this folder.
    pub file_count: u64,
    /// Child folder nodes, ordered by name.
    pub children: Vec<FolderNode>,
}

impl FolderNode {
    /// Total number of nodes in this subtree, including this one.
    pub fn total_folders(&self) -> u64 {
        1 + self.children.iter().map(FolderNode::total_folders).sum::<u64>()
    }
}
