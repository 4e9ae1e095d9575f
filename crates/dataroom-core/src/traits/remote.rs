//! Remote metadata store trait.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::events::FeedEvent;
use crate::result::AppResult;
use crate::types::{Collection, UserId};

/// Authoritative, multi-writer, eventually consistent document store.
///
/// Documents are JSON objects keyed by entity id inside one of three
/// per-user collections. Concurrent writers resolve per document with
/// last-write-wins.
#[async_trait]
pub trait RemoteStore: Send + Sync + std::fmt::Debug + 'static {
    /// Create or replace a document.
    async fn set(&self, user: UserId, collection: Collection, id: Uuid, doc: Value)
        -> AppResult<()>;

    /// Merge-patch an existing document. Fails with `NotFound` when absent.
    async fn update(
        &self,
        user: UserId,
        collection: Collection,
        id: Uuid,
        patch: Value,
    ) -> AppResult<()>;

    /// Delete a document. Deleting a missing document succeeds.
    async fn delete(&self, user: UserId, collection: Collection, id: Uuid) -> AppResult<()>;

    /// Subscribe to a live collection feed.
    ///
    /// The current state of the collection is delivered as the first event.
    async fn subscribe(
        &self,
        user: UserId,
        collection: Collection,
    ) -> AppResult<broadcast::Receiver<FeedEvent>>;

    /// Read the preference document, if one was ever written.
    async fn get_preferences(&self, user: UserId) -> AppResult<Option<Value>>;

    /// Merge-patch the preference document, creating it when absent.
    async fn merge_preferences(&self, user: UserId, patch: Value) -> AppResult<()>;

    /// Check that the store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
