//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use dataroom_cache::{ContentCacheManager, MemoryContentCache};
use dataroom_core::config::{MemoryCacheConfig, SyncConfig};
use dataroom_core::error::AppError;
use dataroom_core::result::AppResult;
use dataroom_core::traits::ContentCache;
use dataroom_core::types::{ContentOwner, ContentRef, FileId, UserId};
use dataroom_realtime::MemoryRemoteStore;
use dataroom_service::{MutationEngine, SyncCoordinator};

/// How long [`TestWorkspace::settle`] waits for one more delivery.
const SETTLE_WAIT: Duration = Duration::from_millis(100);

/// A coordinator wired to in-process stores the test can inspect.
pub struct TestWorkspace {
    /// The coordinator under test
    pub coordinator: SyncCoordinator,
    /// The remote store behind it
    pub remote: Arc<MemoryRemoteStore>,
    /// The content cache behind it
    pub cache: Arc<dyn ContentCache>,
    /// Identity used for signed-in tests
    pub user: UserId,
}

impl TestWorkspace {
    /// A signed-out workspace with an in-memory cache
    pub fn signed_out() -> Self {
        Self::with_cache(memory_cache())
    }

    /// A signed-out workspace over the given cache
    pub fn with_cache(cache: Arc<dyn ContentCache>) -> Self {
        let remote = Arc::new(MemoryRemoteStore::default());
        let coordinator = SyncCoordinator::new(
            MutationEngine::default(),
            remote.clone(),
            cache.clone(),
            &test_sync_config(),
        );
        Self {
            coordinator,
            remote,
            cache,
            user: UserId::new(),
        }
    }

    /// A workspace whose session finished its initial sync
    pub async fn signed_in() -> Self {
        let mut workspace = Self::signed_out();
        workspace.sign_in().await;
        workspace
    }

    /// Sign in as the workspace user and wait for the first deliveries
    pub async fn sign_in(&mut self) {
        self.coordinator
            .sign_in(self.user)
            .await
            .expect("sign in");
        self.coordinator
            .await_initial_sync()
            .await
            .expect("initial sync");
    }

    /// Apply deliveries until the feeds stay quiet. Returns how many were applied.
    pub async fn settle(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(Ok(_)) =
            tokio::time::timeout(SETTLE_WAIT, self.coordinator.process_next()).await
        {
            applied += 1;
        }
        applied
    }
}

/// An in-memory content cache behind the tombstone manager
pub fn memory_cache() -> Arc<dyn ContentCache> {
    Arc::new(ContentCacheManager::from_provider(
        Arc::new(MemoryContentCache::new(&MemoryCacheConfig::default())),
        Duration::from_secs(30),
    ))
}

/// Sync settings with a short initial sync deadline
pub fn test_sync_config() -> SyncConfig {
    SyncConfig {
        feed_buffer_size: 64,
        initial_sync_timeout_seconds: 5,
    }
}

/// A PDF-looking payload
pub fn pdf(body: &str) -> Bytes {
    Bytes::from(format!("%PDF-1.7\n{body}"))
}

/// Cache whose deletes always fail, for cascade cleanup tests
#[derive(Debug)]
pub struct UndeletableCache {
    inner: MemoryContentCache,
}

impl UndeletableCache {
    pub fn new() -> Self {
        Self {
            inner: MemoryContentCache::new(&MemoryCacheConfig::default()),
        }
    }
}

#[async_trait]
impl ContentCache for UndeletableCache {
    fn provider_type(&self) -> &str {
        "undeletable"
    }

    async fn put(&self, owner: ContentOwner, file_id: FileId, data: Bytes) -> AppResult<ContentRef> {
        self.inner.put(owner, file_id, data).await
    }

    async fn get(&self, owner: ContentOwner, file_id: FileId) -> AppResult<Option<ContentRef>> {
        self.inner.get(owner, file_id).await
    }

    async fn read(&self, owner: ContentOwner, file_id: FileId) -> AppResult<Option<Bytes>> {
        self.inner.read(owner, file_id).await
    }

    async fn delete(&self, _owner: ContentOwner, file_id: FileId) -> AppResult<()> {
        Err(AppError::cache(format!("Cannot delete {file_id}")))
    }

    async fn list_all(&self, owner: ContentOwner) -> AppResult<HashMap<FileId, ContentRef>> {
        self.inner.list_all(owner).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
