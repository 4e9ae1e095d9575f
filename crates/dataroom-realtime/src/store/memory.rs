//! In-process remote metadata store.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, warn};
use uuid::Uuid;

use dataroom_core::error::AppError;
use dataroom_core::events::FeedEvent;
use dataroom_core::result::AppResult;
use dataroom_core::traits::remote::RemoteStore;
use dataroom_core::types::{Collection, UserId};

use super::merge::apply_merge_patch;
use crate::bridge::memory_pubsub::MemoryPubSub;
use crate::channel::types::FeedChannel;

/// Remote store holding every collection in process memory.
///
/// Each write republishes the full state of the collection it touched.
/// The failure hooks make writes fail on demand so callers can exercise
/// their partial-failure handling.
#[derive(Debug)]
pub struct MemoryRemoteStore {
    /// Documents per user collection.
    documents: DashMap<FeedChannel, BTreeMap<Uuid, Value>>,
    /// Preference document per user.
    preferences: DashMap<UserId, Value>,
    /// Feed fan-out.
    pubsub: MemoryPubSub,
    /// Number of upcoming writes that fail.
    fail_next: AtomicUsize,
    /// When false every call fails.
    available: AtomicBool,
    /// Successful document writes, for assertions.
    writes_applied: AtomicUsize,
}

impl MemoryRemoteStore {
    /// Create an empty store whose feeds buffer `feed_buffer_size` events.
    pub fn new(feed_buffer_size: usize) -> Self {
        Self {
            documents: DashMap::new(),
            preferences: DashMap::new(),
            pubsub: MemoryPubSub::new(feed_buffer_size),
            fail_next: AtomicUsize::new(0),
            available: AtomicBool::new(true),
            writes_applied: AtomicUsize::new(0),
        }
    }

    /// Make the next `count` writes fail with a remote write error.
    pub fn fail_next_writes(&self, count: usize) {
        self.fail_next.store(count, Ordering::SeqCst);
    }

    /// Toggle whether the store is reachable at all.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Publish a feed error on one collection.
    pub fn inject_feed_error(&self, user: UserId, collection: Collection, message: &str) {
        let channel = FeedChannel::new(user, collection);
        self.pubsub.publish(
            &channel.to_channel_string(),
            FeedEvent::Error {
                collection,
                message: message.to_string(),
            },
        );
    }

    /// Number of document writes that succeeded so far.
    pub fn writes_applied(&self) -> usize {
        self.writes_applied.load(Ordering::SeqCst)
    }

    /// Read one document directly.
    pub fn document(&self, user: UserId, collection: Collection, id: Uuid) -> Option<Value> {
        self.documents
            .get(&FeedChannel::new(user, collection))
            .and_then(|docs| docs.get(&id).cloned())
    }

    /// Number of documents in a collection.
    pub fn document_count(&self, user: UserId, collection: Collection) -> usize {
        self.documents
            .get(&FeedChannel::new(user, collection))
            .map(|docs| docs.len())
            .unwrap_or(0)
    }

    fn check_reachable(&self) -> AppResult<()> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(AppError::remote_write("Remote store is unavailable"));
        }
        Ok(())
    }

    fn check_write(&self, what: &str) -> AppResult<()> {
        self.check_reachable()?;
        let injected = self
            .fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            warn!(what, "Injected remote write failure");
            return Err(AppError::remote_write(format!("Write rejected: {what}")));
        }
        Ok(())
    }

    fn publish_locked(&self, channel: FeedChannel, documents: &BTreeMap<Uuid, Value>) {
        let receivers = self.pubsub.publish(
            &channel.to_channel_string(),
            FeedEvent::Snapshot {
                collection: channel.collection,
                documents: documents.clone(),
            },
        );
        debug!(%channel, documents = documents.len(), receivers, "Published feed delivery");
    }
}

impl Default for MemoryRemoteStore {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn set(
        &self,
        user: UserId,
        collection: Collection,
        id: Uuid,
        doc: Value,
    ) -> AppResult<()> {
        self.check_write(&format!("set {collection}/{id}"))?;
        let channel = FeedChannel::new(user, collection);
        let mut docs = self.documents.entry(channel).or_default();
        docs.insert(id, doc);
        self.publish_locked(channel, &docs);
        self.writes_applied.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn update(
        &self,
        user: UserId,
        collection: Collection,
        id: Uuid,
        patch: Value,
    ) -> AppResult<()> {
        self.check_write(&format!("update {collection}/{id}"))?;
        let channel = FeedChannel::new(user, collection);
        let mut docs = self.documents.entry(channel).or_default();
        let Some(doc) = docs.get_mut(&id) else {
            return Err(AppError::not_found(format!(
                "Document {collection}/{id} not found"
            )));
        };
        apply_merge_patch(doc, &patch);
        self.publish_locked(channel, &docs);
        self.writes_applied.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self, user: UserId, collection: Collection, id: Uuid) -> AppResult<()> {
        self.check_write(&format!("delete {collection}/{id}"))?;
        let channel = FeedChannel::new(user, collection);
        let mut docs = self.documents.entry(channel).or_default();
        if docs.remove(&id).is_some() {
            self.publish_locked(channel, &docs);
        }
        self.writes_applied.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn subscribe(
        &self,
        user: UserId,
        collection: Collection,
    ) -> AppResult<broadcast::Receiver<FeedEvent>> {
        self.check_reachable()?;
        let channel = FeedChannel::new(user, collection);
        let docs = self.documents.entry(channel).or_default();
        let rx = self.pubsub.subscribe(&channel.to_channel_string());
        self.publish_locked(channel, &docs);
        Ok(rx)
    }

    async fn get_preferences(&self, user: UserId) -> AppResult<Option<Value>> {
        self.check_reachable()?;
        Ok(self.preferences.get(&user).map(|prefs| prefs.clone()))
    }

    async fn merge_preferences(&self, user: UserId, patch: Value) -> AppResult<()> {
        self.check_write("merge preferences")?;
        let mut prefs = self
            .preferences
            .entry(user)
            .or_insert_with(|| Value::Object(Default::default()));
        apply_merge_patch(&mut prefs, &patch);
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.available.load(Ordering::SeqCst))
    }
}
