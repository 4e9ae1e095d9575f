//! The three independently subscribable remote collections.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A remote metadata collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    /// Room documents.
    Rooms,
    /// Folder documents.
    Folders,
    /// File record documents.
    Files,
}

impl Collection {
    /// All collections, in the order feeds are subscribed.
    pub const ALL: [Collection; 3] = [Self::Rooms, Self::Folders, Self::Files];

    /// Collection name as used in feed channel paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rooms => "rooms",
            Self::Folders => "folders",
            Self::Files => "files",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
