//! Error types for the Pacer library.
//!
//! This crate provides the error taxonomy shared by the Pacer workspace and the
//! classification machinery the retry policy uses to tell transient failures
//! from fatal ones.
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! Operation failures are never wrapped unless retries are exhausted, in which
//! case they are returned inside [`RetryExhausted`].
//!
//! # Examples
//!
//! ```
//! use pacer_error::{FailureClass, RetryableError};
//!
//! let err = "upstream gateway timeout".to_string();
//! assert_eq!(err.failure_class(), FailureClass::ServerError);
//! assert!(err.is_retryable());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod classify;
mod config;
mod error;
mod operation;
mod retry;
mod store;

pub use classify::{FailureClass, RETRYABLE_PATTERNS, RetryableError, classify_message};
pub use config::ConfigError;
pub use error::{PacerError, PacerErrorKind, PacerResult};
pub use operation::{MessageError, OperationError};
pub use retry::{RetryExhausted, RetryFailure};
pub use store::{StoreError, StoreErrorKind, StoreResult};
