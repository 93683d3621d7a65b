//! Shared counter stores backing the rate limiter.
//!
//! A store owns one capability: an atomic reservation of the next permitted
//! call slot for a key. Stores hold no policy; fail-open handling lives in
//! [`crate::RateLimiter`].

mod memory;
mod redis;

pub use self::memory::InMemoryCounterStore;
pub use self::redis::{DEFAULT_REDIS_URL, REDIS_URL_ENV, RedisCounterStore, STORE_TIMEOUT};

use async_trait::async_trait;
use pacer_core::RateLimitKey;
use pacer_error::StoreResult;
use std::fmt;

/// Atomic "reserve next slot" capability.
///
/// Implementations must perform the following as one atomic step relative to
/// every concurrent caller on the same key:
///
/// 1. Read the stored timestamp `current` for `key` (possibly absent).
/// 2. Read the store's own clock `now` in epoch milliseconds.
/// 3. If `current` is absent or `current + distance_ms < now`, store `now` and
///    return `0`.
/// 4. Otherwise store `current + distance_ms` and return
///    `current + distance_ms - now`.
///
/// The returned value is how many milliseconds the caller must wait before
/// proceeding.
#[async_trait]
pub trait CounterStore: Send + Sync + fmt::Debug {
    /// Reserve the next call slot for `key`, returning the wait in milliseconds.
    async fn reserve(&self, key: &RateLimitKey, distance_ms: u64) -> StoreResult<u64>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}
