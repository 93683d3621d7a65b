//! Mock counter stores.

use async_trait::async_trait;
use pacer_core::RateLimitKey;
use pacer_error::{StoreError, StoreErrorKind, StoreResult};
use pacer_rate_limit::{CounterStore, InMemoryCounterStore};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Store that always fails, as an unreachable Redis would.
#[derive(Debug, Default)]
pub struct FailingStore {
    calls: AtomicUsize,
}

impl FailingStore {
    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CounterStore for FailingStore {
    async fn reserve(&self, _key: &RateLimitKey, _distance_ms: u64) -> StoreResult<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::new(StoreErrorKind::Connection(
            "Connection refused (os error 111)".to_string(),
        )))
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}

/// In-memory store that counts reservations.
#[derive(Debug, Default)]
pub struct CountingStore {
    inner: InMemoryCounterStore,
    calls: AtomicUsize,
}

impl CountingStore {
    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CounterStore for CountingStore {
    async fn reserve(&self, key: &RateLimitKey, distance_ms: u64) -> StoreResult<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.reserve(key, distance_ms).await
    }

    fn backend(&self) -> &'static str {
        "counting"
    }
}
