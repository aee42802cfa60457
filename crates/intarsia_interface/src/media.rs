//! Media download and storage seams.

use async_trait::async_trait;
use intarsia_error::IntarsiaResult;

/// A file written into managed storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Identifier assigned by the storage.
    pub id: u64,
    /// Final path, after any collision rename.
    pub path: String,
}

/// Fetch remote binary content.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Download the content behind a URL.
    async fn fetch(&self, url: &str) -> IntarsiaResult<Vec<u8>>;
}

/// Write binary content into managed local storage.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Store bytes under the requested path.
    ///
    /// When the path already exists the file is stored under a renamed
    /// variant instead of overwriting; the returned path is authoritative.
    async fn store(&self, path: &str, bytes: &[u8]) -> IntarsiaResult<StoredFile>;
}
