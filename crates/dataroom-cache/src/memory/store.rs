//! In-memory content cache implementation using the moka crate.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use moka::future::Cache;
use tracing::debug;

use dataroom_core::config::cache::MemoryCacheConfig;
use dataroom_core::result::AppResult;
use dataroom_core::traits::content::ContentCache;
use dataroom_core::types::{ContentOwner, ContentRef, FileId};

use crate::keys;

/// In-memory content cache provider using moka.
///
/// Capacity is measured in payload bytes; the least recently used payloads
/// are evicted first once the limit is reached.
#[derive(Debug, Clone)]
pub struct MemoryContentCache {
    /// The underlying moka cache.
    cache: Cache<String, Bytes>,
}

impl MemoryContentCache {
    /// Create a new in-memory cache from configuration.
    pub fn new(config: &MemoryCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity_bytes)
            .weigher(|_key: &String, value: &Bytes| -> u32 {
                u32::try_from(value.len()).unwrap_or(u32::MAX)
            })
            .build();

        Self { cache }
    }

    fn content_ref(key: &str, data: &Bytes) -> ContentRef {
        ContentRef::new(keys::memory_uri(key), data.len() as u64)
    }
}

#[async_trait]
impl ContentCache for MemoryContentCache {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn put(&self, owner: ContentOwner, file_id: FileId, data: Bytes) -> AppResult<ContentRef> {
        let key = keys::content_key(owner, file_id);
        let content = Self::content_ref(&key, &data);
        self.cache.insert(key, data).await;
        debug!(%owner, %file_id, bytes = content.size_bytes, "Cached content in memory");
        Ok(content)
    }

    async fn get(&self, owner: ContentOwner, file_id: FileId) -> AppResult<Option<ContentRef>> {
        let key = keys::content_key(owner, file_id);
        Ok(self
            .cache
            .get(&key)
            .await
            .map(|data| Self::content_ref(&key, &data)))
    }

    async fn read(&self, owner: ContentOwner, file_id: FileId) -> AppResult<Option<Bytes>> {
        Ok(self.cache.get(&keys::content_key(owner, file_id)).await)
    }

    async fn delete(&self, owner: ContentOwner, file_id: FileId) -> AppResult<()> {
        self.cache.remove(&keys::content_key(owner, file_id)).await;
        Ok(())
    }

    async fn list_all(&self, owner: ContentOwner) -> AppResult<HashMap<FileId, ContentRef>> {
        let listed = self
            .cache
            .iter()
            .filter_map(|(key, data)| {
                keys::file_id_from_key(owner, &key).map(|id| (id, Self::content_ref(&key, &data)))
            })
            .collect();
        Ok(listed)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
