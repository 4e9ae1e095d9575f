//! Local content cache trait for binary payloads.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;
use crate::types::{ContentOwner, ContentRef, FileId};

/// Client-local, non-authoritative store for file payloads.
///
/// Entries are addressed by (owner, file id). Losing an entry only means
/// the file is not previewable until it is uploaded again.
#[async_trait]
pub trait ContentCache: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "memory", "local").
    fn provider_type(&self) -> &str;

    /// Store a payload and return its handle. Overwrites an existing entry.
    async fn put(&self, owner: ContentOwner, file_id: FileId, data: Bytes) -> AppResult<ContentRef>;

    /// Look up the handle of a cached payload.
    async fn get(&self, owner: ContentOwner, file_id: FileId) -> AppResult<Option<ContentRef>>;

    /// Read a cached payload.
    async fn read(&self, owner: ContentOwner, file_id: FileId) -> AppResult<Option<Bytes>>;

    /// Remove a payload. Deleting a missing entry succeeds.
    async fn delete(&self, owner: ContentOwner, file_id: FileId) -> AppResult<()>;

    /// Every cached payload of one owner.
    async fn list_all(&self, owner: ContentOwner) -> AppResult<HashMap<FileId, ContentRef>>;

    /// Check whether the provider is usable.
    async fn health_check(&self) -> AppResult<bool>;
}
