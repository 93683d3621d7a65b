//! Retry options and backoff schedules.

use pacer_error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Growth function applied to the retry delay across attempts.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Backoff {
    /// `delay * (attempt + 1)`
    Linear,
    /// `delay * 2^attempt`
    #[default]
    Exponential,
}

impl Backoff {
    /// Delay to wait after the zero-based `attempt` failed.
    ///
    /// # Examples
    ///
    /// ```
    /// use pacer_core::Backoff;
    /// use std::time::Duration;
    ///
    /// let base = Duration::from_millis(1000);
    /// assert_eq!(Backoff::Exponential.delay_for(base, 2), Duration::from_millis(4000));
    /// assert_eq!(Backoff::Linear.delay_for(base, 2), Duration::from_millis(3000));
    /// ```
    pub fn delay_for(self, base: Duration, attempt: u32) -> Duration {
        match self {
            Backoff::Linear => base.saturating_mul(attempt.saturating_add(1)),
            Backoff::Exponential => base.saturating_mul(2u32.saturating_pow(attempt)),
        }
    }
}

/// How many times to retry a failing operation and how long to wait between
/// attempts.
///
/// # Examples
///
/// ```
/// use pacer_core::{Backoff, RetryOptions};
/// use std::time::Duration;
///
/// let options = RetryOptions::default()
///     .with_max_retries(2)
///     .with_backoff(Backoff::Linear);
///
/// let schedule: Vec<_> = options.schedule().collect();
/// assert_eq!(schedule, vec![Duration::from_secs(1), Duration::from_secs(2)]);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_setters::Setters,
)]
#[serde(deny_unknown_fields)]
#[setters(prefix = "with_")]
pub struct RetryOptions {
    /// Retries after the first attempt (default 3).
    #[serde(default = "default_max_retries")]
    max_retries: u32,

    /// Base delay between attempts (default 1000ms).
    #[serde(default = "default_delay", rename = "delay_ms", with = "duration_ms")]
    delay: Duration,

    /// Delay growth (default exponential).
    #[serde(default)]
    backoff: Backoff,
}

fn default_max_retries() -> u32 {
    3
}

fn default_delay() -> Duration {
    Duration::from_millis(1000)
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            delay: default_delay(),
            backoff: Backoff::default(),
        }
    }
}

impl RetryOptions {
    /// Create options from explicit values.
    pub fn new(max_retries: u32, delay: Duration, backoff: Backoff) -> Self {
        Self {
            max_retries,
            delay,
            backoff,
        }
    }

    /// Preset for LLM API calls: 5 retries, 500ms, exponential.
    pub fn llm() -> Self {
        Self::new(5, Duration::from_millis(500), Backoff::Exponential)
    }

    /// Total attempts when every attempt fails transiently.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay to wait after the zero-based `attempt` failed.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff.delay_for(self.delay, attempt)
    }

    /// The full sequence of delays, one per retry.
    pub fn schedule(&self) -> impl Iterator<Item = Duration> + use<> {
        let options = *self;
        (0..options.max_retries).map(move |attempt| options.delay_for(attempt))
    }

    /// Validates that the delay is positive.
    ///
    /// # Errors
    ///
    /// Returns an error if the delay is zero.
    #[track_caller]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.delay.is_zero() {
            return Err(ConfigError::new("Retry delay must be positive, got 0ms"));
        }
        Ok(())
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
