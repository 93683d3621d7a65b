//! Core data types for the Pacer rate limiter.
//!
//! This crate provides the plain values shared by every Pacer component: the
//! rate-limit key that scopes a shared limit, the retry options that shape a
//! backoff schedule, and telemetry setup.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod key;
mod options;
mod telemetry;

pub use key::{DEFAULT_KEY_PREFIX, RateLimitKey};
pub use options::{Backoff, RetryOptions};
pub use telemetry::{SERVICE_NAME, init_telemetry, shutdown_telemetry};
