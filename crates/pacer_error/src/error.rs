//! Top-level error wrapper types.

use crate::{ConfigError, OperationError, StoreError};

/// Every error the Pacer crates construct on their own behalf.
///
/// # Examples
///
/// ```
/// use pacer_error::{ConfigError, PacerError};
///
/// let err: PacerError = ConfigError::new("bad backend").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum PacerErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Counter store error
    #[from(StoreError)]
    Store(StoreError),
    /// Classified operation failure
    #[from(OperationError)]
    Operation(OperationError),
}

/// Pacer error with kind discrimination.
///
/// # Examples
///
/// ```
/// use pacer_error::{ConfigError, PacerResult};
///
/// fn might_fail() -> PacerResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Pacer Error: {}", _0)]
pub struct PacerError(Box<PacerErrorKind>);

impl PacerError {
    /// Create a new error from a kind.
    pub fn new(kind: PacerErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PacerErrorKind {
        &self.0
    }
}

impl<T> From<T> for PacerError
where
    T: Into<PacerErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Pacer operations.
pub type PacerResult<T> = std::result::Result<T, PacerError>;
