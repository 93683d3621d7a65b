//! Distributed rate limiting and retry for rate-limited API callers.
//!
//! This crate coordinates outbound calls to a rate-limited API across
//! independent callers and processes:
//! - [`RateLimiter`] spaces calls sharing a [`pacer_core::RateLimitKey`] by a
//!   minimum distance, reserving slots atomically in a [`CounterStore`]
//! - [`RetryPolicy`] re-invokes failing operations with linear or exponential
//!   backoff, failing fast on fatal errors
//! - [`RateLimitedCaller`] composes both for a single API client
//!
//! ## Counter Stores
//!
//! - [`RedisCounterStore`] - shared across processes via a server-side script
//! - [`InMemoryCounterStore`] - single-process deployments and tests
//!
//! Store failures never block callers: the limiter logs them and proceeds
//! without waiting.

mod caller;
mod config;
mod limiter;
mod retry;
mod store;

pub use caller::{CallerConfig, RateLimitedCaller};
pub use config::{PacerConfig, RateLimitSettings, StoreBackend, StoreConfig};
pub use limiter::RateLimiter;
pub use retry::RetryPolicy;
pub use store::{
    CounterStore, DEFAULT_REDIS_URL, InMemoryCounterStore, REDIS_URL_ENV, RedisCounterStore,
    STORE_TIMEOUT,
};
