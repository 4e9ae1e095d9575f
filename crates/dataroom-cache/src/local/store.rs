//! On-disk content cache rooted at a local directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use dataroom_core::error::{AppError, ErrorKind};
use dataroom_core::result::AppResult;
use dataroom_core::traits::content::ContentCache;
use dataroom_core::types::{ContentOwner, ContentRef, FileId};

/// Content cache storing one file per payload at `<root>/<owner>/<file id>`.
#[derive(Debug, Clone)]
pub struct LocalContentCache {
    /// Root directory for all cached payloads.
    root: PathBuf,
}

impl LocalContentCache {
    /// Create a new on-disk cache rooted at the given path.
    pub async fn new(root_path: impl AsRef<Path>) -> AppResult<Self> {
        let root = root_path.as_ref().to_path_buf();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Cache,
                format!("Failed to create cache root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    fn owner_dir(&self, owner: ContentOwner) -> PathBuf {
        self.root.join(owner.segment())
    }

    fn resolve(&self, owner: ContentOwner, file_id: FileId) -> PathBuf {
        self.owner_dir(owner).join(file_id.to_string())
    }

    fn content_ref(path: &Path, size_bytes: u64) -> ContentRef {
        ContentRef::new(format!("file://{}", path.display()), size_bytes)
    }
}

#[async_trait]
impl ContentCache for LocalContentCache {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn put(&self, owner: ContentOwner, file_id: FileId, data: Bytes) -> AppResult<ContentRef> {
        let dir = self.owner_dir(owner);
        fs::create_dir_all(&dir).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Cache,
                format!("Failed to create owner directory: {}", dir.display()),
                e,
            )
        })?;

        let path = self.resolve(owner, file_id);
        fs::write(&path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Cache,
                format!("Failed to write cached content: {file_id}"),
                e,
            )
        })?;

        debug!(%owner, %file_id, bytes = data.len(), "Cached content on disk");
        Ok(Self::content_ref(&path, data.len() as u64))
    }

    async fn get(&self, owner: ContentOwner, file_id: FileId) -> AppResult<Option<ContentRef>> {
        let path = self.resolve(owner, file_id);
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(Some(Self::content_ref(&path, meta.len()))),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Cache,
                format!("Failed to stat cached content: {file_id}"),
                e,
            )),
        }
    }

    async fn read(&self, owner: ContentOwner, file_id: FileId) -> AppResult<Option<Bytes>> {
        match fs::read(self.resolve(owner, file_id)).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Cache,
                format!("Failed to read cached content: {file_id}"),
                e,
            )),
        }
    }

    async fn delete(&self, owner: ContentOwner, file_id: FileId) -> AppResult<()> {
        match fs::remove_file(self.resolve(owner, file_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Cache,
                format!("Failed to delete cached content: {file_id}"),
                e,
            )),
        }
    }

    async fn list_all(&self, owner: ContentOwner) -> AppResult<HashMap<FileId, ContentRef>> {
        let dir = self.owner_dir(owner);
        let mut listed = HashMap::new();

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(listed),
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Cache,
                    format!("Failed to list cache directory: {}", dir.display()),
                    e,
                ));
            }
        };

        while let Some(entry) = entries.next_entry().await? {
            let Some(file_id) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.parse::<FileId>().ok())
            else {
                continue;
            };
            let meta = entry.metadata().await?;
            if meta.is_file() {
                listed.insert(file_id, Self::content_ref(&entry.path(), meta.len()));
            }
        }

        Ok(listed)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.root.is_dir())
    }
}
