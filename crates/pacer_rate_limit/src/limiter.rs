//! Distributed minimum-interval rate limiter.
//!
//! The limiter asks a [`CounterStore`] to reserve the next call slot for a key
//! and sleeps until that slot arrives. Coordination across processes happens
//! only through the store; there are no in-process locks.

use crate::{CounterStore, InMemoryCounterStore};
use pacer_core::RateLimitKey;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Rate limiter enforcing a minimum distance between calls sharing a key.
///
/// Cloning is cheap; clones share the same store. Construct one per process
/// and hand it to every caller.
///
/// If the store fails for any reason the limiter fails open: it logs the
/// error and lets the call proceed immediately.
///
/// # Example
///
/// ```
/// use pacer_core::RateLimitKey;
/// use pacer_rate_limit::RateLimiter;
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let limiter = RateLimiter::in_memory();
/// let key = RateLimitKey::new("pacer:openai:gpt-4o-mini");
///
/// // The first call on a fresh key never waits
/// limiter.wait(&key, Duration::from_millis(200)).await;
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RateLimiter {
    store: Arc<dyn CounterStore>,
}

impl RateLimiter {
    /// Create a rate limiter over a shared store.
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self { store }
    }

    /// Create a rate limiter backed by a fresh single-process store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryCounterStore::new()))
    }

    /// The store this limiter reserves slots in.
    pub fn store(&self) -> &Arc<dyn CounterStore> {
        &self.store
    }

    /// Reserve the next slot for `key` and return how long to wait for it.
    ///
    /// A zero `distance` (or one shorter than a millisecond) disables limiting
    /// and never touches the store. Store failures yield a zero wait.
    #[instrument(skip(self, key), fields(key = %key, backend = self.store.backend()))]
    pub async fn reserve(&self, key: &RateLimitKey, distance: Duration) -> Duration {
        let distance_ms = u64::try_from(distance.as_millis()).unwrap_or(u64::MAX);
        if distance_ms == 0 {
            return Duration::ZERO;
        }

        match self.store.reserve(key, distance_ms).await {
            Ok(wait_ms) => Duration::from_millis(wait_ms),
            Err(e) => {
                error!(error = %e, "Counter store failed, proceeding without rate limit");
                Duration::ZERO
            }
        }
    }

    /// Wait until a call under `key` is permitted.
    ///
    /// The only observable effect is elapsed time. Dropping the returned
    /// future abandons the wait but not the reserved slot.
    pub async fn wait(&self, key: &RateLimitKey, distance: Duration) {
        let wait = self.reserve(key, distance).await;
        if !wait.is_zero() {
            debug!(key = %key, wait_ms = wait.as_millis() as u64, "Waiting for rate limit slot");
            tokio::time::sleep(wait).await;
        }
    }
}
