//! Counter store error types.

/// Kinds of counter store failures.
///
/// None of these reach callers of the rate limiter: the limiter logs them and
/// lets the call through.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StoreErrorKind {
    /// The configured store URL could not be parsed
    #[display("Invalid store URL: {}", _0)]
    InvalidUrl(String),
    /// Opening a connection to the store failed
    #[display("Store connection failed: {}", _0)]
    Connection(String),
    /// The atomic reservation command failed
    #[display("Store command failed: {}", _0)]
    Command(String),
    /// The store never became reachable for this process
    #[display("Store unavailable: {}", _0)]
    Unavailable(String),
}

/// Counter store error with location tracking.
///
/// # Examples
///
/// ```
/// use pacer_error::{StoreError, StoreErrorKind};
///
/// let err = StoreError::new(StoreErrorKind::Unavailable("redis://localhost:6379".to_string()));
/// assert!(format!("{}", err).contains("unavailable"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Store Error: {} at line {} in {}", kind, line, file)]
pub struct StoreError {
    /// The kind of error that occurred
    pub kind: StoreErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StoreError {
    /// Create a new StoreError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoreErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for counter store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
