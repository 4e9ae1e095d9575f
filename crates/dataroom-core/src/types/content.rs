//! Local binary content handles.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::id::UserId;

/// Owner scope of a content cache entry.
///
/// Signed-out sessions cache under [`ContentOwner::Local`]; signed-in
/// sessions cache under the user id so a later session can re-hydrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentOwner {
    /// No identity, content lives for the local session.
    Local,
    /// A signed-in user.
    User(UserId),
}

impl ContentOwner {
    /// Owner scope for an optional identity.
    pub fn from_user(user: Option<UserId>) -> Self {
        user.map_or(Self::Local, Self::User)
    }

    /// Key segment used by cache providers.
    pub fn segment(&self) -> String {
        match self {
            Self::Local => "local".to_string(),
            Self::User(id) => id.to_string(),
        }
    }
}

impl fmt::Display for ContentOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segment())
    }
}

/// A handle to binary content held by the local content cache.
///
/// Handles are session-local and never written to the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRef {
    /// Provider-specific locator (`memory://…` or `file://…`).
    pub uri: String,
    /// Size of the cached payload in bytes.
    pub size_bytes: u64,
}

impl ContentRef {
    /// Create a new handle.
    pub fn new(uri: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            uri: uri.into(),
            size_bytes,
        }
    }
}
