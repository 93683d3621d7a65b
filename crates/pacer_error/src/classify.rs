//! Failure classification for retry decisions.
//!
//! Errors report a [`FailureClass`] through the [`RetryableError`] trait. Types
//! that carry structure (I/O error kinds, HTTP status codes, JSON error
//! categories) classify from it; types that only carry text fall back to
//! [`classify_message`], which looks for well-known transient substrings.

use std::error::Error;

/// Broad category of an operation failure.
///
/// Everything except [`FailureClass::Fatal`] is considered transient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum FailureClass {
    /// The operation or a network round-trip timed out
    #[display("timeout")]
    Timeout,
    /// Connection refused, reset, or another network-level failure
    #[display("network")]
    Network,
    /// Server-side 5xx condition
    #[display("server error")]
    ServerError,
    /// The remote side signalled a rate limit
    #[display("rate limited")]
    RateLimited,
    /// Truncated or malformed response body
    #[display("malformed response")]
    MalformedResponse,
    /// Anything else; never retried
    #[display("fatal")]
    Fatal,
}

impl FailureClass {
    /// Whether a failure of this class should be retried.
    pub fn is_retryable(self) -> bool {
        !matches!(self, FailureClass::Fatal)
    }
}

/// Lowercase substrings that mark a free-text error message as transient.
///
/// Order matters: the first match decides the class, so the more specific
/// `"gateway timeout"` is listed ahead of `"timeout"`.
pub const RETRYABLE_PATTERNS: &[(&str, FailureClass)] = &[
    ("invalid json response", FailureClass::MalformedResponse),
    ("unexpected end of json", FailureClass::MalformedResponse),
    ("unexpected token", FailureClass::MalformedResponse),
    ("json parse", FailureClass::MalformedResponse),
    ("rate limit", FailureClass::RateLimited),
    ("server error", FailureClass::ServerError),
    ("service unavailable", FailureClass::ServerError),
    ("gateway timeout", FailureClass::ServerError),
    ("bad gateway", FailureClass::ServerError),
    ("timeout", FailureClass::Timeout),
    ("network", FailureClass::Network),
    ("connection", FailureClass::Network),
];

/// Classify a free-text error message.
///
/// Matching is case-insensitive. Messages matching none of
/// [`RETRYABLE_PATTERNS`] are [`FailureClass::Fatal`].
///
/// # Examples
///
/// ```
/// use pacer_error::{FailureClass, classify_message};
///
/// assert_eq!(classify_message("503 Service Unavailable"), FailureClass::ServerError);
/// assert_eq!(classify_message("Unexpected end of JSON input"), FailureClass::MalformedResponse);
/// assert_eq!(classify_message("invalid api key"), FailureClass::Fatal);
/// ```
pub fn classify_message(message: &str) -> FailureClass {
    let message = message.to_lowercase();
    RETRYABLE_PATTERNS
        .iter()
        .find(|(pattern, _)| message.contains(pattern))
        .map(|(_, class)| *class)
        .unwrap_or(FailureClass::Fatal)
}

/// Trait for errors that support retry logic.
///
/// Implement [`RetryableError::failure_class`] for your own error types when
/// they carry structured information. The retry policy only ever asks
/// [`RetryableError::is_retryable`].
///
/// # Examples
///
/// ```
/// use pacer_error::{FailureClass, RetryableError};
///
/// #[derive(Debug)]
/// struct Status(u16);
///
/// impl RetryableError for Status {
///     fn failure_class(&self) -> FailureClass {
///         match self.0 {
///             429 => FailureClass::RateLimited,
///             500..=599 => FailureClass::ServerError,
///             _ => FailureClass::Fatal,
///         }
///     }
/// }
///
/// assert!(Status(503).is_retryable());
/// assert!(!Status(401).is_retryable());
/// ```
pub trait RetryableError {
    /// Category of this failure.
    fn failure_class(&self) -> FailureClass;

    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool {
        self.failure_class().is_retryable()
    }
}

impl<T: RetryableError + ?Sized> RetryableError for &T {
    fn failure_class(&self) -> FailureClass {
        (**self).failure_class()
    }
}

impl RetryableError for str {
    fn failure_class(&self) -> FailureClass {
        classify_message(self)
    }
}

impl RetryableError for String {
    fn failure_class(&self) -> FailureClass {
        classify_message(self)
    }
}

impl RetryableError for Box<dyn Error + Send + Sync> {
    fn failure_class(&self) -> FailureClass {
        classify_message(&self.to_string())
    }
}

impl RetryableError for std::io::Error {
    fn failure_class(&self) -> FailureClass {
        use std::io::ErrorKind;

        match self.kind() {
            ErrorKind::TimedOut => FailureClass::Timeout,
            ErrorKind::ConnectionRefused
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::NotConnected
            | ErrorKind::AddrNotAvailable
            | ErrorKind::BrokenPipe
            | ErrorKind::UnexpectedEof => FailureClass::Network,
            _ => classify_message(&self.to_string()),
        }
    }
}

#[cfg(feature = "json")]
impl RetryableError for serde_json::Error {
    fn failure_class(&self) -> FailureClass {
        use serde_json::error::Category;

        match self.classify() {
            Category::Syntax | Category::Eof => FailureClass::MalformedResponse,
            Category::Io => FailureClass::Network,
            Category::Data => classify_message(&self.to_string()),
        }
    }
}

#[cfg(feature = "http")]
impl RetryableError for reqwest::Error {
    fn failure_class(&self) -> FailureClass {
        if self.is_timeout() {
            return FailureClass::Timeout;
        }
        if let Some(status) = self.status() {
            return match status.as_u16() {
                429 => FailureClass::RateLimited,
                408 => FailureClass::Timeout,
                500..=599 => FailureClass::ServerError,
                _ => FailureClass::Fatal,
            };
        }
        if self.is_connect() {
            FailureClass::Network
        } else if self.is_decode() || self.is_body() {
            FailureClass::MalformedResponse
        } else {
            classify_message(&self.to_string())
        }
    }
}
