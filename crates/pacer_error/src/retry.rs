//! Retry outcome types.

use crate::{FailureClass, RetryableError};
use std::fmt;

/// Terminal failure after every permitted attempt failed transiently.
///
/// Carries the last underlying error and the total number of attempts made,
/// which is `max_retries + 1`.
///
/// # Examples
///
/// ```
/// use pacer_error::RetryExhausted;
///
/// let err = RetryExhausted::new("gateway timeout".to_string(), 4);
/// assert_eq!(err.attempts(), 4);
/// assert_eq!(err.message(), "Operation failed after 4 attempts: gateway timeout");
/// ```
#[derive(Debug, Clone)]
pub struct RetryExhausted<E> {
    last_error: E,
    attempts: u32,
    line: u32,
    file: &'static str,
}

impl<E> RetryExhausted<E> {
    /// Create a new exhaustion error with automatic location tracking.
    #[track_caller]
    pub fn new(last_error: E, attempts: u32) -> Self {
        let location = std::panic::Location::caller();
        Self {
            last_error,
            attempts,
            line: location.line(),
            file: location.file(),
        }
    }

    /// The error returned by the final attempt.
    pub fn last_error(&self) -> &E {
        &self.last_error
    }

    /// Total number of attempts made.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Consume the wrapper, returning the last underlying error.
    pub fn into_last_error(self) -> E {
        self.last_error
    }

    /// Location where the retry loop gave up, as `(file, line)`.
    pub fn location(&self) -> (&'static str, u32) {
        (self.file, self.line)
    }
}

impl<E: fmt::Display> RetryExhausted<E> {
    /// Message stating the attempt count and the last cause.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl<E: fmt::Display> fmt::Display for RetryExhausted<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Operation failed after {} attempts: {}",
            self.attempts, self.last_error
        )
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for RetryExhausted<E> {}

impl<E: RetryableError> RetryableError for RetryExhausted<E> {
    fn failure_class(&self) -> FailureClass {
        self.last_error.failure_class()
    }
}

/// Why a retried operation ultimately failed.
#[derive(Debug, Clone)]
pub enum RetryFailure<E> {
    /// The operation failed with a non-retryable error, returned untouched.
    Fatal(E),
    /// Every attempt failed with a retryable error.
    Exhausted(RetryExhausted<E>),
}

impl<E> RetryFailure<E> {
    /// Whether the retry budget was used up.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryFailure::Exhausted(_))
    }

    /// The underlying operation error, whichever way the run ended.
    pub fn error(&self) -> &E {
        match self {
            RetryFailure::Fatal(err) => err,
            RetryFailure::Exhausted(exhausted) => exhausted.last_error(),
        }
    }

    /// Consume the failure, returning the underlying operation error.
    pub fn into_error(self) -> E {
        match self {
            RetryFailure::Fatal(err) => err,
            RetryFailure::Exhausted(exhausted) => exhausted.into_last_error(),
        }
    }

    /// Attempt count, when the budget was exhausted.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            RetryFailure::Fatal(_) => None,
            RetryFailure::Exhausted(exhausted) => Some(exhausted.attempts()),
        }
    }
}

impl<E: fmt::Display> fmt::Display for RetryFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryFailure::Fatal(err) => write!(f, "{}", err),
            RetryFailure::Exhausted(exhausted) => write!(f, "{}", exhausted),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for RetryFailure<E> {}

impl<E> From<RetryExhausted<E>> for RetryFailure<E> {
    fn from(exhausted: RetryExhausted<E>) -> Self {
        RetryFailure::Exhausted(exhausted)
    }
}
