//! Single-process counter store.

use super::CounterStore;
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use pacer_core::RateLimitKey;
use pacer_error::StoreResult;
use tokio::time::Instant;
use tracing::trace;

/// Counter store for deployments where every caller lives in one process.
///
/// The per-key entry lock of the underlying map makes each reservation
/// atomic. The clock is the wall time at construction advanced by a monotonic
/// Tokio instant, so it honors paused time in tests.
///
/// # Example
///
/// ```
/// use pacer_core::RateLimitKey;
/// use pacer_rate_limit::{CounterStore, InMemoryCounterStore};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store = InMemoryCounterStore::new();
/// let key = RateLimitKey::new("demo");
///
/// assert_eq!(store.reserve(&key, 1_000).await.unwrap(), 0);
/// assert!(store.reserve(&key, 1_000).await.unwrap() > 0);
/// # }
/// ```
#[derive(Debug)]
pub struct InMemoryCounterStore {
    slots: DashMap<String, u64>,
    epoch_ms: u64,
    started: Instant,
}

impl InMemoryCounterStore {
    /// Create an empty store.
    pub fn new() -> Self {
        let epoch_ms = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default();
        Self {
            slots: DashMap::new(),
            epoch_ms,
            started: Instant::now(),
        }
    }

    /// The store clock in epoch milliseconds.
    pub fn now_ms(&self) -> u64 {
        let elapsed = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.epoch_ms.saturating_add(elapsed)
    }

    /// The next permitted call time for `key`, if it was ever reserved.
    pub fn next_slot(&self, key: &RateLimitKey) -> Option<u64> {
        self.slots.get(key.as_str()).map(|slot| *slot)
    }
}

impl Default for InMemoryCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn reserve(&self, key: &RateLimitKey, distance_ms: u64) -> StoreResult<u64> {
        let wait_ms = match self.slots.entry(key.as_str().to_owned()) {
            Entry::Vacant(entry) => {
                entry.insert(self.now_ms());
                0
            }
            Entry::Occupied(mut entry) => {
                let now = self.now_ms();
                let next = entry.get().saturating_add(distance_ms);
                if next < now {
                    entry.insert(now);
                    0
                } else {
                    entry.insert(next);
                    next - now
                }
            }
        };
        trace!(key = %key, wait_ms, "Reserved slot in memory");
        Ok(wait_ms)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
