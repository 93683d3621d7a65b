//! Structured operation failure.

use crate::{FailureClass, RetryableError, classify_message};

/// An operation failure with an explicit [`FailureClass`].
///
/// Useful for callers that know what went wrong and do not want the retry
/// decision to depend on message text.
///
/// # Examples
///
/// ```
/// use pacer_error::{FailureClass, OperationError, RetryableError};
///
/// let err = OperationError::new(FailureClass::RateLimited, "quota hit");
/// assert!(err.is_retryable());
///
/// let err = OperationError::fatal("model not found");
/// assert!(!err.is_retryable());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Operation Error ({}): {} at line {} in {}", class, message, line, file)]
pub struct OperationError {
    /// Failure category driving the retry decision
    pub class: FailureClass,
    /// Human-readable description
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl OperationError {
    /// Create a new OperationError with an explicit class.
    #[track_caller]
    pub fn new(class: FailureClass, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            class,
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// Create an OperationError that is never retried.
    #[track_caller]
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::new(FailureClass::Fatal, message)
    }

    /// Create an OperationError classified from its message text.
    #[track_caller]
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(classify_message(&message), message)
    }
}

impl RetryableError for OperationError {
    fn failure_class(&self) -> FailureClass {
        self.class
    }
}

/// A failure that carries only its message text.
///
/// Classified on demand with [`classify_message`], so it behaves exactly like
/// a plain `String` error while still implementing [`std::error::Error`].
///
/// # Examples
///
/// ```
/// use pacer_error::{FailureClass, MessageError, RetryableError};
///
/// let err = MessageError::new("502 Bad Gateway");
/// assert_eq!(err.failure_class(), FailureClass::ServerError);
/// assert_eq!(err.to_string(), "502 Bad Gateway");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("{}", message)]
pub struct MessageError {
    message: String,
}

impl MessageError {
    /// Wrap an error message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The wrapped message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for MessageError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for MessageError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl RetryableError for MessageError {
    fn failure_class(&self) -> FailureClass {
        classify_message(&self.message)
    }
}
