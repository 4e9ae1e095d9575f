//! File record entity model.

use std::fmt;

use chrono::{DateTime, Utc};
use dataroom_core::types::{ContentRef, FileId, FolderId, RoomId};
use serde::{Deserialize, Serialize};

/// How a file record came into the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOrigin {
    /// Uploaded by the user.
    #[default]
    Upload,
    /// Seeded sample content.
    Demo,
}

impl fmt::Display for FileOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upload => write!(f, "upload"),
            Self::Demo => write!(f, "demo"),
        }
    }
}

/// A leaf document in a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Unique file identifier.
    pub id: FileId,
    /// The file name, always carrying the required extension.
    pub name: String,
    /// The folder containing this file.
    pub parent_folder_id: FolderId,
    /// The room this file belongs to.
    pub room_id: RoomId,
    /// Payload size in bytes.
    pub size_bytes: u64,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// Handle to locally cached content. Never serialized.
    #[serde(skip)]
    pub content_ref: Option<ContentRef>,
    /// Origin tag.
    #[serde(default)]
    pub origin: FileOrigin,
}

impl FileRecord {
    /// Create a record that is not yet hydrated.
    pub fn new(
        id: FileId,
        name: impl Into<String>,
        parent_folder_id: FolderId,
        room_id: RoomId,
        size_bytes: u64,
        origin: FileOrigin,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            parent_folder_id,
            room_id,
            size_bytes,
            created_at: Utc::now(),
            content_ref: None,
            origin,
        }
    }

    /// Whether cached content is available for preview.
    pub fn is_hydrated(&self) -> bool {
        self.content_ref.is_some()
    }

    /// Get the file extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .filter(|(base, _)| !base.is_empty())
            .map(|(_, ext)| ext.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> FileRecord {
        FileRecord::new(
            FileId::new(),
            name,
            FolderId::new(),
            RoomId::new(),
            10,
            FileOrigin::Upload,
        )
    }

    #[test]
    fn test_extension() {
        assert_eq!(record("Report.PDF").extension().as_deref(), Some("pdf"));
        assert_eq!(record("archive.tar.gz").extension().as_deref(), Some("gz"));
        assert_eq!(record("README").extension(), None);
        assert_eq!(record(".pdf").extension(), None);
    }

    #[test]
    fn test_content_ref_is_never_serialized() {
        let mut file = record("Report.pdf");
        file.content_ref = Some(ContentRef::new("memory://local/x", 10));
        let json = serde_json::to_value(&file).expect("serialize");
        assert!(json.get("content_ref").is_none());
        let back: FileRecord = serde_json::from_value(json).expect("deserialize");
        assert!(!back.is_hydrated());
        assert_eq!(back.name, "Report.pdf");
    }
}
