//! Work queue error types.

/// Specific error conditions for the durable work queue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum QueueErrorKind {
    /// The queue item could not be serialized
    #[display("Failed to serialize queue item: {}", _0)]
    Serialize(String),
    /// The queue item could not be deserialized
    #[display("Failed to deserialize queue item: {}", _0)]
    Deserialize(String),
    /// The queue backend rejected the operation
    #[display("Queue backend error: {}", _0)]
    Backend(String),
    /// A completion was acknowledged for an item that was never claimed
    #[display("Completion for unclaimed item on entity '{}' id {}", _0, _1)]
    UnknownItem(String, u64),
}

/// Error type for work queue operations.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Queue Error: {} at line {} in {}", kind, line, file)]
pub struct QueueError {
    /// The specific error condition
    pub kind: QueueErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl QueueError {
    /// Create a new QueueError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: QueueErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
