//! Cache key builders for content entries.
//!
//! Every entry is addressed as `<owner>/<file id>`, where the owner segment
//! is `local` for signed-out sessions or the user id.

use dataroom_core::types::{ContentOwner, FileId};

/// Key for one cached payload.
pub fn content_key(owner: ContentOwner, file_id: FileId) -> String {
    format!("{}/{file_id}", owner.segment())
}

/// Prefix shared by every key of one owner.
pub fn owner_prefix(owner: ContentOwner) -> String {
    format!("{}/", owner.segment())
}

/// Recover the file id from a key of the given owner.
pub fn file_id_from_key(owner: ContentOwner, key: &str) -> Option<FileId> {
    key.strip_prefix(&owner_prefix(owner))?.parse().ok()
}

/// Locator handed out for in-memory entries.
pub fn memory_uri(key: &str) -> String {
    format!("memory://{key}")
}
