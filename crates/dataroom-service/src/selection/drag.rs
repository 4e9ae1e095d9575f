//! Drag-transfer payload encoding and validation.
//!
//! The wire form is the JSON body `{"folderIds": [...], "fileIds": [...]}`.

use std::str::FromStr;

use dataroom_core::result::AppResult;
use dataroom_core::types::{FileId, FolderId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::hierarchy::ItemId;

/// Items carried by one drag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragPayload {
    /// Dragged folders.
    pub folder_ids: Vec<FolderId>,
    /// Dragged files.
    pub file_ids: Vec<FileId>,
}

impl DragPayload {
    pub fn new(folder_ids: Vec<FolderId>, file_ids: Vec<FileId>) -> Self {
        Self {
            folder_ids,
            file_ids,
        }
    }

    /// A payload carrying one item.
    pub fn single(item: ItemId) -> Self {
        match item {
            ItemId::Folder(id) => Self::new(vec![id], Vec::new()),
            ItemId::File(id) => Self::new(Vec::new(), vec![id]),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.folder_ids.is_empty() && self.file_ids.is_empty()
    }

    /// Encode as the JSON transfer body.
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a received transfer body.
    ///
    /// Returns `None` for malformed JSON or when either list is missing or
    /// not an array. Entries that are empty or not ids are dropped.
    pub fn parse(raw: &str) -> Option<Self> {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, "Ignoring malformed drag payload");
                return None;
            }
        };
        let folder_ids = id_list::<FolderId>(&value, "folderIds")?;
        let file_ids = id_list::<FileId>(&value, "fileIds")?;
        Some(Self::new(folder_ids, file_ids))
    }
}

fn id_list<T: FromStr>(value: &Value, key: &str) -> Option<Vec<T>> {
    let entries = value.get(key)?.as_array()?;
    Some(
        entries
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse().ok())
            .collect(),
    )
}
