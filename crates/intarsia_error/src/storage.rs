//! Storage error types.

/// Specific error conditions for entity and media storage operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// The entity being worked on no longer exists
    #[display("Entity '{}' with id {} was not found", _0, _1)]
    EntityNotFound(String, u64),
    /// Saving the entity failed
    #[display("Failed to save entity: {}", _0)]
    SaveFailed(String),
    /// A remote binary could not be downloaded
    #[display("Failed to download media: {}", _0)]
    DownloadFailed(String),
    /// A local file could not be written
    #[display("Failed to write file '{}': {}", path, message)]
    FileWrite {
        /// Destination path
        path: String,
        /// Error message
        message: String,
    },
    /// A taxonomy term could not be created
    #[display("Failed to create term '{}': {}", name, message)]
    TermCreate {
        /// The term name
        name: String,
        /// Error message
        message: String,
    },
}

/// Error type for storage operations.
///
/// # Examples
///
/// ```
/// use intarsia_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::EntityNotFound("node".into(), 12));
/// assert!(format!("{}", err).contains("12"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The specific error condition
    pub kind: StorageErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl StorageError {
    /// Create a new StorageError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
