//! Top-level error wrapper types.

use crate::{ConfigError, QueueError, RequestError, ResponseError, RuleNotFoundError, StorageError};

/// This is the foundation error enum for the Intarsia workspace.
///
/// # Examples
///
/// ```
/// use intarsia_error::{IntarsiaError, RequestError};
///
/// let req_err = RequestError::new("Connection failed");
/// let err: IntarsiaError = req_err.into();
/// assert!(format!("{}", err).contains("Request Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum IntarsiaErrorKind {
    /// A configured rule did not resolve
    #[from(RuleNotFoundError)]
    RuleNotFound(RuleNotFoundError),
    /// The generation backend call failed
    #[from(RequestError)]
    Request(RequestError),
    /// The generation backend output was unusable
    #[from(ResponseError)]
    Response(ResponseError),
    /// A field configuration was incomplete or malformed
    #[from(ConfigError)]
    Config(ConfigError),
    /// Entity or media storage failed
    #[from(StorageError)]
    Storage(StorageError),
    /// Work queue operation failed
    #[from(QueueError)]
    Queue(QueueError),
}

/// Intarsia error with kind discrimination.
///
/// # Examples
///
/// ```
/// use intarsia_error::{IntarsiaResult, ConfigError};
///
/// fn might_fail() -> IntarsiaResult<()> {
///     Err(ConfigError::new("Missing key"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Intarsia Error: {}", _0)]
pub struct IntarsiaError(Box<IntarsiaErrorKind>);

impl IntarsiaError {
    /// Create a new error from a kind.
    pub fn new(kind: IntarsiaErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &IntarsiaErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to IntarsiaErrorKind
impl<T> From<T> for IntarsiaError
where
    T: Into<IntarsiaErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Intarsia operations.
///
/// # Examples
///
/// ```
/// use intarsia_error::{IntarsiaResult, ResponseError};
///
/// fn normalize() -> IntarsiaResult<String> {
///     Err(ResponseError::new("No usable values"))?
/// }
/// ```
pub type IntarsiaResult<T> = std::result::Result<T, IntarsiaError>;
