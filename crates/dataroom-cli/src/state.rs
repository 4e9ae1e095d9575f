//! Signed-out workspace state between CLI invocations.
//!
//! The snapshot lives in a JSON file; content payloads live in the
//! configured content cache. Opening the workspace re-attaches cached
//! content to the stored records the same way a resumed session does.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dataroom_cache::ContentCacheManager;
use dataroom_core::config::AppConfig;
use dataroom_core::error::{AppError, ErrorKind};
use dataroom_core::result::AppResult;
use dataroom_core::traits::{ContentCache, RemoteStore};
use dataroom_core::types::{FolderId, RoomId};
use dataroom_entity::Snapshot;
use dataroom_realtime::MemoryRemoteStore;
use dataroom_service::{MutationEngine, SyncCoordinator};
use tracing::{debug, info};

/// A coordinator bound to the snapshot file it was loaded from.
#[derive(Debug)]
pub struct LocalWorkspace {
    /// The coordinator owning the loaded snapshot.
    pub coordinator: SyncCoordinator,
    state_path: PathBuf,
}

impl LocalWorkspace {
    /// Open the workspace described by `config`.
    ///
    /// A missing state file yields an empty workspace.
    pub async fn open(config: &AppConfig) -> AppResult<Self> {
        let cache: Arc<dyn ContentCache> = Arc::new(ContentCacheManager::new(&config.cache).await?);
        let remote: Arc<dyn RemoteStore> =
            Arc::new(MemoryRemoteStore::new(config.sync.feed_buffer_size));
        Self::open_with(config, remote, cache).await
    }

    /// Open the workspace with explicit stores.
    pub async fn open_with(
        config: &AppConfig,
        remote: Arc<dyn RemoteStore>,
        cache: Arc<dyn ContentCache>,
    ) -> AppResult<Self> {
        let engine = MutationEngine::from_config(&config.workspace);
        let mut coordinator = SyncCoordinator::new(engine, remote, cache, &config.sync);
        let state_path = PathBuf::from(&config.workspace.state_path);

        let snapshot = load_snapshot(&state_path).await?;
        let hydrated = coordinator.restore_local(snapshot).await?;
        debug!(path = %state_path.display(), hydrated, "Workspace opened");

        Ok(Self {
            coordinator,
            state_path,
        })
    }

    /// Write the current snapshot back to the state file.
    pub async fn save(&self) -> AppResult<()> {
        save_snapshot(&self.state_path, &self.coordinator.snapshot()).await
    }

    /// The state file location.
    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// The folder commands act on when none is given: the active one.
    pub fn folder_or_active(&self, folder: Option<FolderId>) -> AppResult<FolderId> {
        folder
            .or(self.coordinator.snapshot().active_folder_id)
            .ok_or_else(|| {
                AppError::validation("No folder given and no active folder; create a room first")
            })
    }

    /// The room commands act on when none is given: the active one.
    pub fn room_or_active(&self, room: Option<RoomId>) -> AppResult<RoomId> {
        room.or(self.coordinator.snapshot().active_room_id)
            .ok_or_else(|| AppError::validation("No room given and no active room"))
    }
}

/// Read a snapshot file; a missing file is an empty workspace.
pub async fn load_snapshot(path: &Path) -> AppResult<Snapshot> {
    match tokio::fs::read(path).await {
        Ok(raw) => {
            let snapshot: Snapshot = serde_json::from_slice(&raw).map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("State file '{}' is not a valid workspace", path.display()),
                    e,
                )
            })?;
            Ok(snapshot)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "No state file yet, starting empty");
            Ok(Snapshot::new())
        }
        Err(e) => Err(e.into()),
    }
}

/// Write a snapshot file atomically via a sibling temp file.
pub async fn save_snapshot(path: &Path, snapshot: &Snapshot) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_vec_pretty(snapshot)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, path).await?;
    debug!(path = %path.display(), "Workspace saved");
    Ok(())
}
