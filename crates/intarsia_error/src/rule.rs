//! Rule lookup error types.

/// A configured rule identifier did not resolve against the registry.
///
/// This is a configuration error: the job is not retried.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Rule Not Found: {} at line {} in {}", message, line, file)]
pub struct RuleNotFoundError {
    /// The underlying error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl RuleNotFoundError {
    /// Create a new RuleNotFoundError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use intarsia_error::RuleNotFoundError;
    ///
    /// let err = RuleNotFoundError::new("The rule could not be found: email");
    /// assert!(err.message.contains("email"));
    /// ```
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
