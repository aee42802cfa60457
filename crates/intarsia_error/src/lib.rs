//! Error types for the Intarsia field interpolation pipeline.
//!
//! This crate provides the foundation error types used throughout the
//! Intarsia workspace.
//!
//! # Error Hierarchy
//!
//! Simple error conditions are plain structs with a message and source
//! location; richer concerns use the `*ErrorKind` enum + wrapper struct
//! pattern. All errors use `#[track_caller]` for automatic location capture.
//!
//! # Examples
//!
//! ```
//! use intarsia_error::{IntarsiaResult, RequestError};
//!
//! fn call_backend() -> IntarsiaResult<String> {
//!     Err(RequestError::new("Connection refused"))?
//! }
//!
//! match call_backend() {
//!     Ok(text) => println!("Got: {}", text),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod queue;
mod request;
mod response;
mod rule;
mod storage;

pub use config::ConfigError;
pub use error::{IntarsiaError, IntarsiaErrorKind, IntarsiaResult};
pub use queue::{QueueError, QueueErrorKind};
pub use request::RequestError;
pub use response::ResponseError;
pub use rule::RuleNotFoundError;
pub use storage::{StorageError, StorageErrorKind};
