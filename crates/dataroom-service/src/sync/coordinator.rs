//! The synchronization coordinator: the single writer of the published
//! snapshot for one session.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use dataroom_core::config::SyncConfig;
use dataroom_core::error::{AppError, ErrorKind};
use dataroom_core::events::{ChangeOrigin, FeedEvent, WorkspaceEvent};
use dataroom_core::result::AppResult;
use dataroom_core::traits::{ContentCache, RemoteStore};
use dataroom_core::types::{Collection, ContentOwner, ContentRef, FileId, FolderId, RoomId, UserId};
use dataroom_entity::{Preferences, Snapshot};
use futures::future::join_all;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::feed::{FeedState, FeedTracker};
use super::merge::{apply_delivery, apply_preferences};
use super::pending::PendingWrites;
use super::plan::{RemoteWrite, plan_writes, preference_patch};
use crate::hierarchy::verify_invariants;
use crate::mutation::{
    Applied, DeleteOutcome, FileUpload, MoveOutcome, MutationEngine, RoomCreated, UploadOutcome,
};
use crate::selection::DragPayload;

/// Capacity of the observer event channel.
const EVENT_BUFFER: usize = 256;

/// Live feed plumbing of a signed-in session.
#[derive(Debug)]
struct Session {
    user: UserId,
    queue: mpsc::Receiver<FeedEvent>,
    forwarders: Vec<JoinHandle<()>>,
}

impl Session {
    fn abort(self) {
        for task in self.forwarders {
            task.abort();
        }
    }
}

/// Owns the workspace snapshot and keeps it consistent with the remote
/// metadata store and the local content cache.
///
/// Signed out, every mutation applies to the local snapshot only. Signed
/// in, a mutation is written to the remote store first and mirrored
/// locally only after every write succeeded. Feed deliveries are applied
/// in arrival order, never while a mutation is running.
#[derive(Debug)]
pub struct SyncCoordinator {
    engine: MutationEngine,
    remote: Arc<dyn RemoteStore>,
    cache: Arc<dyn ContentCache>,
    snapshot: Arc<Snapshot>,
    session: Option<Session>,
    feeds: FeedTracker,
    pending: PendingWrites,
    events: broadcast::Sender<WorkspaceEvent>,
    feed_buffer_size: usize,
    initial_sync_timeout: Duration,
}

impl SyncCoordinator {
    /// Create a signed-out coordinator with an empty workspace.
    pub fn new(
        engine: MutationEngine,
        remote: Arc<dyn RemoteStore>,
        cache: Arc<dyn ContentCache>,
        config: &SyncConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            engine,
            remote,
            cache,
            snapshot: Arc::new(Snapshot::new()),
            session: None,
            feeds: FeedTracker::new(),
            pending: PendingWrites::new(),
            events,
            feed_buffer_size: config.feed_buffer_size.max(1),
            initial_sync_timeout: Duration::from_secs(config.initial_sync_timeout_seconds),
        }
    }

    /// The current snapshot. Later changes never affect a returned value.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot)
    }

    /// The engine used for validation.
    pub fn engine(&self) -> &MutationEngine {
        &self.engine
    }

    /// Observe applied changes.
    pub fn subscribe_events(&self) -> broadcast::Receiver<WorkspaceEvent> {
        self.events.subscribe()
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<UserId> {
        self.session.as_ref().map(|s| s.user)
    }

    /// Whether a session is active.
    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    /// Content cache scope of the current identity.
    pub fn owner(&self) -> ContentOwner {
        ContentOwner::from_user(self.user())
    }

    /// State of each collection feed.
    pub fn feed_status(&self) -> Vec<(Collection, FeedState)> {
        self.feeds.statuses()
    }

    // ── Session ──────────────────────────────────────────────────────

    /// Replace the signed-out workspace with a stored snapshot and attach
    /// any content still cached locally. Returns the number of hydrated
    /// records.
    pub async fn restore_local(&mut self, snapshot: Snapshot) -> AppResult<usize> {
        if self.is_signed_in() {
            return Err(AppError::session("Cannot restore a local workspace while signed in"));
        }
        let mut snapshot = snapshot;
        snapshot.release_content_refs();
        let hydrated = match self.cache.list_all(ContentOwner::Local).await {
            Ok(refs) => snapshot.hydrate(&refs),
            Err(e) => {
                warn!(error = %e, "Could not list cached content");
                0
            }
        };
        info!(rooms = snapshot.rooms.len(), hydrated, "Local workspace restored");
        self.publish(snapshot, ChangeOrigin::Local, "restore_local");
        Ok(hydrated)
    }

    /// Start a signed-in session: reset the workspace and subscribe the
    /// three collection feeds. Call [`Self::await_initial_sync`] next.
    pub async fn sign_in(&mut self, user: UserId) -> AppResult<()> {
        if self.session.is_some() {
            self.sign_out();
        }

        let (tx, queue) = mpsc::channel(self.feed_buffer_size * Collection::ALL.len());
        let mut forwarders: Vec<JoinHandle<()>> = Vec::with_capacity(Collection::ALL.len());
        for collection in Collection::ALL {
            let feed = match self.remote.subscribe(user, collection).await {
                Ok(feed) => feed,
                Err(e) => {
                    for task in &forwarders {
                        task.abort();
                    }
                    return Err(AppError::with_source(
                        ErrorKind::Session,
                        format!("Could not subscribe to {collection}"),
                        e,
                    ));
                }
            };
            forwarders.push(tokio::spawn(forward_feed(collection, feed, tx.clone())));
        }

        self.session = Some(Session {
            user,
            queue,
            forwarders,
        });
        self.feeds.reset();
        self.feeds.start();
        self.pending.clear();

        info!(user_id = %user, "Signed in");
        let _ = self.events.send(WorkspaceEvent::SessionChanged {
            user_id: Some(user),
        });
        self.publish(Snapshot::new(), ChangeOrigin::Local, "sign_in");
        Ok(())
    }

    /// Apply feed deliveries until every collection is ready or failed,
    /// then re-hydrate cached content and apply stored preferences.
    pub async fn await_initial_sync(&mut self) -> AppResult<()> {
        let user = self
            .user()
            .ok_or_else(|| AppError::session("Not signed in"))?;
        let deadline = tokio::time::Instant::now() + self.initial_sync_timeout;

        while !self.feeds.all_settled() {
            let Some(session) = self.session.as_mut() else {
                return Err(AppError::session("Session ended during initial sync"));
            };
            let event = match tokio::time::timeout_at(deadline, session.queue.recv()).await {
                Ok(Some(event)) => event,
                Ok(None) => return Err(AppError::session("Feed queue closed")),
                Err(_) => {
                    return Err(AppError::session(format!(
                        "Initial sync did not finish within {}s",
                        self.initial_sync_timeout.as_secs()
                    )));
                }
            };
            self.apply_feed_event(event);
        }

        let mut next = (*self.snapshot).clone();
        let hydrated = match self.cache.list_all(ContentOwner::User(user)).await {
            Ok(refs) => next.hydrate(&refs),
            Err(e) => {
                warn!(user_id = %user, error = %e, "Could not list cached content");
                0
            }
        };
        let preferences = self.load_preferences(user).await;
        let used_preferences = apply_preferences(&mut next, preferences.as_ref());

        info!(
            user_id = %user,
            hydrated,
            used_preferences,
            "Initial sync complete"
        );
        self.publish(next, ChangeOrigin::Remote, "initial_sync");
        Ok(())
    }

    /// End the session. Feed forwarders stop and content handles are
    /// released; cached payloads stay for the next resume.
    pub fn sign_out(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        let user = session.user;
        session.abort();

        let released = self.snapshot.content_refs().len();
        self.feeds.reset();
        self.pending.clear();

        info!(user_id = %user, released, "Signed out");
        let _ = self.events.send(WorkspaceEvent::SessionChanged { user_id: None });
        self.publish(Snapshot::new(), ChangeOrigin::Local, "sign_out");
    }

    // ── Feed processing ──────────────────────────────────────────────

    /// Apply every delivery already queued. Returns how many were applied.
    pub fn process_pending(&mut self) -> usize {
        let mut applied = 0;
        loop {
            let Some(session) = self.session.as_mut() else {
                return applied;
            };
            let Ok(event) = session.queue.try_recv() else {
                return applied;
            };
            self.apply_feed_event(event);
            applied += 1;
        }
    }

    /// Wait for the next delivery and apply it.
    pub async fn process_next(&mut self) -> AppResult<Collection> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| AppError::session("Not signed in"))?;
        let event = session
            .queue
            .recv()
            .await
            .ok_or_else(|| AppError::session("Feed queue closed"))?;
        let collection = event.collection();
        self.apply_feed_event(event);
        Ok(collection)
    }

    fn apply_feed_event(&mut self, event: FeedEvent) {
        match event {
            FeedEvent::Snapshot {
                collection,
                documents,
            } => {
                let effective = self.pending.reconcile(collection, &documents);
                let next = apply_delivery(&self.snapshot, collection, &effective);
                let became_ready = self.feeds.mark_ready(collection);
                if self.feeds.all_ready() {
                    if let Err(violations) = verify_invariants(&next, self.engine.policy()) {
                        warn!(
                            %collection,
                            violations = violations.len(),
                            first = ?violations.first(),
                            "Feed delivery produced a broken hierarchy"
                        );
                    }
                }
                self.publish(next, ChangeOrigin::Remote, collection.as_str());
                if became_ready {
                    let _ = self.events.send(WorkspaceEvent::FeedReady { collection });
                }
            }
            FeedEvent::Error {
                collection,
                message,
            } => {
                warn!(%collection, error = %message, "Feed failed");
                self.feeds.mark_error(collection, message.clone());
                let _ = self
                    .events
                    .send(WorkspaceEvent::FeedFailed { collection, message });
            }
        }
    }

    async fn load_preferences(&self, user: UserId) -> Option<Preferences> {
        match self.remote.get_preferences(user).await {
            Ok(Some(doc)) => match serde_json::from_value(doc) {
                Ok(prefs) => Some(prefs),
                Err(e) => {
                    warn!(user_id = %user, error = %e, "Ignoring malformed preferences");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(user_id = %user, error = %e, "Could not read preferences");
                None
            }
        }
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Create a room with its root folder and make it active.
    pub async fn create_room(&mut self, name: &str) -> AppResult<RoomCreated> {
        let applied = self.engine.create_room(&self.snapshot, name)?;
        self.commit("create_room", applied).await
    }

    /// Rename a room.
    pub async fn rename_room(&mut self, room_id: RoomId, name: &str) -> AppResult<()> {
        let applied = self.engine.rename_room(&self.snapshot, room_id, name)?;
        self.commit("rename_room", applied).await
    }

    /// Delete a room with everything in it, including cached content.
    pub async fn delete_room(&mut self, room_id: RoomId) -> AppResult<DeleteOutcome> {
        let applied = self.engine.delete_room(&self.snapshot, room_id)?;
        let outcome = self.commit("delete_room", applied).await?;
        self.purge_content(&outcome.removed_file_ids).await;
        Ok(outcome)
    }

    /// Make a room and its root folder active.
    pub async fn select_room(&mut self, room_id: RoomId) -> AppResult<()> {
        let applied = self.engine.select_room(&self.snapshot, room_id)?;
        self.commit("select_room", applied).await
    }

    /// Make a folder and its room active.
    pub async fn select_folder(&mut self, folder_id: FolderId) -> AppResult<()> {
        let applied = self.engine.select_folder(&self.snapshot, folder_id)?;
        self.commit("select_folder", applied).await
    }

    /// Create a folder under `parent_id`. Returns the new folder's id.
    pub async fn create_folder(&mut self, parent_id: FolderId, name: &str) -> AppResult<FolderId> {
        let applied = self.engine.create_folder(&self.snapshot, parent_id, name)?;
        self.commit("create_folder", applied).await
    }

    /// Rename a folder.
    pub async fn rename_folder(&mut self, folder_id: FolderId, name: &str) -> AppResult<()> {
        let applied = self.engine.rename_folder(&self.snapshot, folder_id, name)?;
        self.commit("rename_folder", applied).await
    }

    /// Delete a folder with everything below it.
    pub async fn delete_folder(&mut self, folder_id: FolderId) -> AppResult<DeleteOutcome> {
        let applied = self.engine.delete_folder(&self.snapshot, folder_id)?;
        let outcome = self.commit("delete_folder", applied).await?;
        self.purge_content(&outcome.removed_file_ids).await;
        Ok(outcome)
    }

    /// Rename a file, keeping the required extension.
    pub async fn rename_file(&mut self, file_id: FileId, name: &str) -> AppResult<()> {
        let applied = self.engine.rename_file(&self.snapshot, file_id, name)?;
        self.commit("rename_file", applied).await
    }

    /// Delete a file and its cached content.
    pub async fn delete_file(&mut self, file_id: FileId) -> AppResult<DeleteOutcome> {
        let applied = self.engine.delete_file(&self.snapshot, file_id)?;
        let outcome = self.commit("delete_file", applied).await?;
        self.purge_content(&outcome.removed_file_ids).await;
        Ok(outcome)
    }

    /// Move folders and files into `target_id`.
    pub async fn move_items(
        &mut self,
        target_id: FolderId,
        folder_ids: &[FolderId],
        file_ids: &[FileId],
    ) -> AppResult<MoveOutcome> {
        let applied = self
            .engine
            .move_items(&self.snapshot, target_id, folder_ids, file_ids)?;
        self.commit("move_items", applied).await
    }

    /// Drop a drag payload onto a folder.
    pub async fn drop_payload(
        &mut self,
        target_id: FolderId,
        payload: &DragPayload,
    ) -> AppResult<MoveOutcome> {
        self.move_items(target_id, &payload.folder_ids, &payload.file_ids)
            .await
    }

    /// Delete several folders and files; room roots are kept.
    pub async fn bulk_delete(
        &mut self,
        folder_ids: &[FolderId],
        file_ids: &[FileId],
    ) -> AppResult<DeleteOutcome> {
        let applied = self.engine.bulk_delete(&self.snapshot, folder_ids, file_ids)?;
        let outcome = self.commit("bulk_delete", applied).await?;
        self.purge_content(&outcome.removed_file_ids).await;
        Ok(outcome)
    }

    /// Upload payloads into a folder.
    ///
    /// Content is cached before any metadata is written. If the metadata
    /// write fails, the freshly cached entries are removed again.
    pub async fn upload_files(
        &mut self,
        folder_id: FolderId,
        files: Vec<(String, Bytes)>,
    ) -> AppResult<UploadOutcome> {
        let (uploads, mut payloads): (Vec<FileUpload>, HashMap<FileId, Bytes>) = files
            .into_iter()
            .map(|(name, data)| {
                let upload = FileUpload::new(name, data.len() as u64);
                let id = upload.id;
                (upload, (id, data))
            })
            .unzip();

        let mut applied = self.engine.add_files(&self.snapshot, folder_id, &uploads)?;
        let owner = self.owner();

        let mut cached: Vec<FileId> = Vec::with_capacity(applied.output.created.len());
        for id in applied.output.created.clone() {
            let data = payloads.remove(&id).unwrap_or_default();
            match self.cache.put(owner, id, data).await {
                Ok(handle) => {
                    attach_handle(&mut applied.snapshot, id, handle);
                    cached.push(id);
                }
                Err(e) => {
                    self.discard_content(owner, &cached).await;
                    return Err(e);
                }
            }
        }

        match self.commit("upload_files", applied).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                self.discard_content(owner, &cached).await;
                Err(e)
            }
        }
    }

    /// Read the cached payload of a file. `None` means the record exists
    /// but its content is not available locally.
    pub async fn read_content(&self, file_id: FileId) -> AppResult<Option<Bytes>> {
        if self.snapshot.file(file_id).is_none() {
            return Err(AppError::not_found(format!("File {file_id} not found")));
        }
        self.cache.read(self.owner(), file_id).await
    }

    // ── Internals ────────────────────────────────────────────────────

    /// Make an engine result visible.
    ///
    /// Signed in, the remote writes must all succeed first; on failure the
    /// snapshot is left exactly as it was.
    async fn commit<T>(&mut self, operation: &str, applied: Applied<T>) -> AppResult<T> {
        let (next, output) = applied.into_parts();

        if let Some(user) = self.user() {
            let writes = plan_writes(&self.snapshot, &next)?;
            self.execute_writes(user, operation, &writes).await?;
            if let Err(e) = self.pending.record(&writes, &next) {
                warn!(operation, error = %e, "Could not track writes for feed echo");
            }
            match preference_patch(&self.snapshot, &next) {
                Ok(Some(patch)) => {
                    if let Err(e) = self.remote.merge_preferences(user, patch).await {
                        warn!(user_id = %user, error = %e, "Could not store preferences");
                    }
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "Could not encode preferences"),
            }
        }

        self.publish(next, ChangeOrigin::Local, operation);
        Ok(output)
    }

    async fn execute_writes(
        &self,
        user: UserId,
        operation: &str,
        writes: &[RemoteWrite],
    ) -> AppResult<()> {
        if writes.is_empty() {
            return Ok(());
        }
        let total = writes.len();
        let results = join_all(writes.iter().cloned().map(|write| {
            let remote = Arc::clone(&self.remote);
            async move {
                let label = write.to_string();
                let result = match write {
                    RemoteWrite::Set { collection, id, doc } => {
                        remote.set(user, collection, id, doc).await
                    }
                    RemoteWrite::Update {
                        collection,
                        id,
                        patch,
                    } => remote.update(user, collection, id, patch).await,
                    RemoteWrite::Delete { collection, id } => {
                        remote.delete(user, collection, id).await
                    }
                };
                result.map_err(|e| (label, e))
            }
        }))
        .await;

        let mut failures = results.into_iter().filter_map(Result::err);
        let Some((label, first)) = failures.next() else {
            debug!(operation, writes = total, "Remote writes applied");
            return Ok(());
        };
        let failed = 1 + failures.count();
        warn!(operation, failed, total, first = %label, "Remote writes failed");
        Err(AppError::with_source(
            ErrorKind::RemoteWrite,
            format!("{failed} of {total} remote writes failed for {operation}"),
            first,
        ))
    }

    /// Best-effort removal of cached content for deleted files.
    async fn purge_content(&self, file_ids: &HashSet<FileId>) {
        if file_ids.is_empty() {
            return;
        }
        let owner = self.owner();
        let results = join_all(
            file_ids
                .iter()
                .map(|id| async move { (*id, self.cache.delete(owner, *id).await) }),
        )
        .await;

        let failed: Vec<FileId> = results
            .into_iter()
            .filter_map(|(id, result)| result.err().map(|_| id))
            .collect();
        if !failed.is_empty() {
            let err = AppError::partial_cascade(format!(
                "{} of {} cached payloads could not be removed",
                failed.len(),
                file_ids.len()
            ));
            warn!(%owner, error = %err, "Content cleanup incomplete");
        }
    }

    async fn discard_content(&self, owner: ContentOwner, file_ids: &[FileId]) {
        for id in file_ids {
            if let Err(e) = self.cache.delete(owner, *id).await {
                warn!(%owner, file_id = %id, error = %e, "Could not discard cached upload");
            }
        }
    }

    fn publish(&mut self, next: Snapshot, origin: ChangeOrigin, operation: &str) {
        let room_changed = next.active_room_id != self.snapshot.active_room_id;
        self.snapshot = Arc::new(next);

        let _ = self.events.send(WorkspaceEvent::SnapshotChanged {
            origin,
            operation: operation.to_string(),
        });
        if room_changed {
            let _ = self.events.send(WorkspaceEvent::ActiveRoomChanged {
                room_id: self.snapshot.active_room_id,
            });
        }
    }
}

impl Drop for SyncCoordinator {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            session.abort();
        }
    }
}

fn attach_handle(snapshot: &mut Snapshot, file_id: FileId, handle: ContentRef) {
    if let Some(file) = snapshot.files.get_mut(&file_id) {
        file.content_ref = Some(handle);
    }
}

/// Move one feed's deliveries into the coordinator queue.
async fn forward_feed(
    collection: Collection,
    mut feed: broadcast::Receiver<FeedEvent>,
    queue: mpsc::Sender<FeedEvent>,
) {
    loop {
        match feed.recv().await {
            Ok(event) => {
                if queue.send(event).await.is_err() {
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                // Deliveries carry the whole collection, so the next one
                // catches up.
                warn!(%collection, skipped, "Feed lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
    debug!(%collection, "Feed forwarder stopped");
}
