//! Configuration error types.

use std::fmt;
use std::path::{Path, PathBuf};

/// A configuration source could not be loaded, parsed, or validated.
///
/// Carries the offending file when one is known, and the source location
/// that raised the error.
#[derive(Debug, Clone, derive_more::Error)]
pub struct ConfigError {
    /// What was wrong with the configuration
    pub message: String,
    /// Configuration file the error refers to, if any
    pub path: Option<PathBuf>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a ConfigError not tied to a particular configuration file.
    ///
    /// # Examples
    ///
    /// ```
    /// use pacer_error::ConfigError;
    ///
    /// let err = ConfigError::new("retry delay must be positive");
    /// assert!(err.message.contains("must be positive"));
    /// assert!(err.path.is_none());
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            path: None,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Create a ConfigError for the configuration file at `path`.
    ///
    /// ```
    /// use pacer_error::ConfigError;
    ///
    /// let err = ConfigError::for_path("pacer.toml", "invalid type: string \"soon\", expected u64");
    /// assert!(err.to_string().contains("in config pacer.toml"));
    /// ```
    #[track_caller]
    pub fn for_path(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            path: Some(path.as_ref().to_path_buf()),
            line: location.line(),
            file: location.file(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration Error: {}", self.message)?;
        if let Some(path) = &self.path {
            write!(f, " in config {}", path.display())?;
        }
        write!(f, " at line {} in {}", self.line, self.file)
    }
}
