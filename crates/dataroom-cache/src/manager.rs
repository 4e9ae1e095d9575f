//! Content cache manager that dispatches to the configured provider.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use moka::future::Cache;
use tracing::{debug, info, warn};

use dataroom_core::config::cache::CacheConfig;
use dataroom_core::error::AppError;
use dataroom_core::result::AppResult;
use dataroom_core::traits::content::ContentCache;
use dataroom_core::types::{ContentOwner, ContentRef, FileId};

use crate::keys;
use crate::local::LocalContentCache;
use crate::memory::MemoryContentCache;

/// Content cache manager wrapping the configured provider.
///
/// Every delete leaves a tombstone for the configured TTL. A `put` for a
/// tombstoned key is refused, and a `put` that was already in flight when
/// the delete happened removes what it wrote and reports a conflict, so a
/// deleted file can never reappear in the cache.
#[derive(Debug, Clone)]
pub struct ContentCacheManager {
    /// The inner cache provider.
    inner: Arc<dyn ContentCache>,
    /// Keys deleted recently.
    tombstones: Cache<String, ()>,
}

impl ContentCacheManager {
    /// Create a new cache manager from configuration.
    pub async fn new(config: &CacheConfig) -> AppResult<Self> {
        let inner: Arc<dyn ContentCache> = match config.provider.as_str() {
            "memory" => {
                info!("Initializing in-memory content cache");
                Arc::new(MemoryContentCache::new(&config.memory))
            }
            "local" => {
                info!(root = %config.local.root, "Initializing on-disk content cache");
                Arc::new(LocalContentCache::new(&config.local.root).await?)
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown cache provider: '{other}'. Supported: memory, local"
                )));
            }
        };

        Ok(Self::from_provider(
            inner,
            Duration::from_secs(config.tombstone_ttl_seconds),
        ))
    }

    /// Create a cache manager from an existing provider (for testing).
    pub fn from_provider(provider: Arc<dyn ContentCache>, tombstone_ttl: Duration) -> Self {
        let tombstones = Cache::builder()
            .max_capacity(100_000)
            .time_to_live(tombstone_ttl)
            .build();
        Self {
            inner: provider,
            tombstones,
        }
    }

    /// Get a reference to the inner provider.
    pub fn provider(&self) -> &dyn ContentCache {
        self.inner.as_ref()
    }

    /// Whether a delete for this key happened within the tombstone TTL.
    pub fn is_tombstoned(&self, owner: ContentOwner, file_id: FileId) -> bool {
        self.tombstones
            .contains_key(&keys::content_key(owner, file_id))
    }
}

#[async_trait]
impl ContentCache for ContentCacheManager {
    fn provider_type(&self) -> &str {
        self.inner.provider_type()
    }

    async fn put(&self, owner: ContentOwner, file_id: FileId, data: Bytes) -> AppResult<ContentRef> {
        if self.is_tombstoned(owner, file_id) {
            return Err(AppError::conflict(format!(
                "Content for file {file_id} was deleted"
            )));
        }

        let content = self.inner.put(owner, file_id, data).await?;

        if self.is_tombstoned(owner, file_id) {
            warn!(%owner, %file_id, "Content write finished after delete, discarding");
            self.inner.delete(owner, file_id).await?;
            return Err(AppError::conflict(format!(
                "Content for file {file_id} was deleted during the write"
            )));
        }

        Ok(content)
    }

    async fn get(&self, owner: ContentOwner, file_id: FileId) -> AppResult<Option<ContentRef>> {
        self.inner.get(owner, file_id).await
    }

    async fn read(&self, owner: ContentOwner, file_id: FileId) -> AppResult<Option<Bytes>> {
        self.inner.read(owner, file_id).await
    }

    async fn delete(&self, owner: ContentOwner, file_id: FileId) -> AppResult<()> {
        self.tombstones
            .insert(keys::content_key(owner, file_id), ())
            .await;
        debug!(%owner, %file_id, "Recorded content tombstone");
        self.inner.delete(owner, file_id).await
    }

    async fn list_all(&self, owner: ContentOwner) -> AppResult<HashMap<FileId, ContentRef>> {
        let mut listed = self.inner.list_all(owner).await?;
        listed.retain(|file_id, _| !self.is_tombstoned(owner, *file_id));
        Ok(listed)
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
