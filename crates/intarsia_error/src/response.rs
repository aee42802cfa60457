//! Generation response error types.

/// The backend responded but its output could not be turned into any
/// usable value after all normalization heuristics.
///
/// Logged by the processing layer; the target field is left unmodified.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Response Error: {} at line {} in {}", message, line, file)]
pub struct ResponseError {
    /// The underlying error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ResponseError {
    /// Create a new ResponseError with the given message at the current location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
