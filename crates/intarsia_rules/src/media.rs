//! HTTP media fetching and local file storage.

use async_trait::async_trait;
use intarsia_error::{IntarsiaResult, StorageError, StorageErrorKind};
use intarsia_interface::{MediaFetcher, MediaStorage, StoredFile};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Downloads media over HTTP(S) with a shared connection pool.
#[derive(Debug, Clone, Default)]
pub struct HttpMediaFetcher {
    client: reqwest::Client,
}

impl HttpMediaFetcher {
    /// Create a fetcher with its own client.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MediaFetcher for HttpMediaFetcher {
    async fn fetch(&self, url: &str) -> IntarsiaResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StorageError::new(StorageErrorKind::DownloadFailed(format!("{url}: {e}"))))?;
        let response = response
            .error_for_status()
            .map_err(|e| StorageError::new(StorageErrorKind::DownloadFailed(format!("{url}: {e}"))))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| StorageError::new(StorageErrorKind::DownloadFailed(format!("{url}: {e}"))))?;
        Ok(bytes.to_vec())
    }
}

/// Stores files under a base directory on the local filesystem.
///
/// Existing paths are never overwritten; a colliding name gets a numeric
/// suffix before the extension (`photo.png`, `photo_0.png`, `photo_1.png`).
#[derive(Debug)]
pub struct LocalMediaStorage {
    base: PathBuf,
    next_id: AtomicU64,
}

impl LocalMediaStorage {
    /// Create storage rooted at a directory.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            next_id: AtomicU64::new(1),
        }
    }

    fn renamed(path: &Path, attempt: u64) -> PathBuf {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("file");
        let name = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{stem}_{attempt}.{ext}"),
            None => format!("{stem}_{attempt}"),
        };
        path.with_file_name(name)
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn store(&self, path: &str, bytes: &[u8]) -> IntarsiaResult<StoredFile> {
        let requested = self.base.join(path.trim_start_matches('/'));
        if let Some(parent) = requested.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::FileWrite {
                    path: parent.display().to_string(),
                    message: e.to_string(),
                })
            })?;
        }
        let mut target = requested.clone();
        let mut attempt = 0u64;
        while tokio::fs::try_exists(&target).await.unwrap_or(false) {
            target = Self::renamed(&requested, attempt);
            attempt += 1;
        }
        tokio::fs::write(&target, bytes)
            .await
            .map_err(|e| {
                StorageError::new(StorageErrorKind::FileWrite {
                    path: target.display().to_string(),
                    message: e.to_string(),
                })
            })?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let stored = target.display().to_string();
        debug!(file_id = id, path = %stored, "stored media file");
        Ok(StoredFile { id, path: stored })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn collisions_rename_instead_of_overwriting() {
        let dir = std::env::temp_dir().join(format!("intarsia-media-{}", std::process::id()));
        let storage = LocalMediaStorage::new(&dir);
        let first = storage.store("images/photo.png", b"one").await.unwrap();
        let second = storage.store("images/photo.png", b"two").await.unwrap();
        assert_ne!(first.path, second.path);
        assert!(second.path.ends_with("photo_0.png"));
        let original = tokio::fs::read(&first.path).await.unwrap();
        assert_eq!(original, b"one");
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[test]
    fn rename_preserves_the_extension() {
        let renamed = LocalMediaStorage::renamed(Path::new("a/photo.png"), 3);
        assert_eq!(renamed, Path::new("a/photo_3.png"));
        let no_ext = LocalMediaStorage::renamed(Path::new("a/photo"), 0);
        assert_eq!(no_ext, Path::new("a/photo_0"));
    }
}
