//! Redis-backed counter store shared across processes.

use super::CounterStore;
use ::redis::aio::{ConnectionManager, ConnectionManagerConfig};
use ::redis::{Client, Script};
use async_trait::async_trait;
use pacer_core::RateLimitKey;
use pacer_error::{StoreError, StoreErrorKind, StoreResult};
use std::fmt;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, error, instrument};

/// Environment variable holding the store endpoint.
pub const REDIS_URL_ENV: &str = "REDIS_URL";

/// Endpoint used when [`REDIS_URL_ENV`] is unset.
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";

/// Upper bound on opening the connection and on each reservation round-trip.
pub const STORE_TIMEOUT: Duration = Duration::from_secs(1);

// Runs as one script so no other client can interleave between GET and SET.
// The clock is the server's TIME, never the caller's.
const RESERVE_SCRIPT: &str = r#"
local current = redis.call('GET', KEYS[1])
local time = redis.call('TIME')
local now = tonumber(time[1]) * 1000 + math.floor(tonumber(time[2]) / 1000)
local distance = tonumber(ARGV[1])
if current == false or tonumber(current) + distance < now then
  redis.call('SET', KEYS[1], string.format('%d', now))
  return 0
end
local next_slot = tonumber(current) + distance
redis.call('SET', KEYS[1], string.format('%d', next_slot))
return next_slot - now
"#;

/// Counter store shared by every process pointing at the same Redis.
///
/// Construct one per process and share it. The Redis client is created
/// immediately; the multiplexed connection is opened on the first
/// reservation and reused afterwards. Connecting and every script call are
/// bounded by [`STORE_TIMEOUT`]. Neither an invalid URL nor a failed
/// first connect is fatal: they are logged once and every reservation then
/// reports [`StoreErrorKind::InvalidUrl`] or [`StoreErrorKind::Unavailable`],
/// which the rate limiter turns into a zero wait.
///
/// Stored timestamps never expire.
///
/// # Example
///
/// ```no_run
/// use pacer_rate_limit::{RateLimiter, RedisCounterStore};
/// use std::sync::Arc;
///
/// let store = Arc::new(RedisCounterStore::from_env());
/// let limiter = RateLimiter::new(store);
/// ```
pub struct RedisCounterStore {
    url: String,
    client: Option<Client>,
    connection: OnceCell<Option<ConnectionManager>>,
    script: Script,
}

impl RedisCounterStore {
    /// Create a store for `url` without connecting.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let client = match Client::open(url.as_str()) {
            Ok(client) => Some(client),
            Err(e) => {
                error!(error = %e, "Invalid counter store URL, rate limiting disabled");
                None
            }
        };

        Self {
            url,
            client,
            connection: OnceCell::new(),
            script: Script::new(RESERVE_SCRIPT),
        }
    }

    /// Create a store for the URL in `REDIS_URL`, or the local default.
    pub fn from_env() -> Self {
        let url = std::env::var(REDIS_URL_ENV).unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string());
        Self::new(url)
    }

    /// The configured endpoint.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether a connection was opened successfully.
    pub fn is_connected(&self) -> bool {
        matches!(self.connection.get(), Some(Some(_)))
    }

    async fn connection(&self) -> StoreResult<ConnectionManager> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| StoreError::new(StoreErrorKind::InvalidUrl(self.url.clone())))?;

        let manager = self
            .connection
            .get_or_init(|| async {
                // One bounded attempt; later reservations fail open without reconnecting
                let config = ConnectionManagerConfig::new()
                    .set_number_of_retries(0)
                    .set_connection_timeout(STORE_TIMEOUT)
                    .set_response_timeout(STORE_TIMEOUT);
                match client.get_connection_manager_with_config(config).await {
                    Ok(manager) => {
                        debug!("Connected to counter store");
                        Some(manager)
                    }
                    Err(e) => {
                        let err = StoreError::new(StoreErrorKind::Connection(e.to_string()));
                        error!(error = %err, "Counter store connection failed");
                        None
                    }
                }
            })
            .await;

        // ConnectionManager is a cheap handle onto one multiplexed connection
        manager
            .clone()
            .ok_or_else(|| StoreError::new(StoreErrorKind::Unavailable(self.url.clone())))
    }
}

impl fmt::Debug for RedisCounterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCounterStore")
            .field("url", &self.url)
            .field("valid_url", &self.client.is_some())
            .field("connected", &self.is_connected())
            .finish()
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    #[instrument(skip(self, key), fields(key = %key))]
    async fn reserve(&self, key: &RateLimitKey, distance_ms: u64) -> StoreResult<u64> {
        let mut connection = self.connection().await?;

        let wait_ms: i64 = self
            .script
            .key(key.as_str())
            .arg(distance_ms)
            .invoke_async(&mut connection)
            .await
            .map_err(|e| StoreError::new(StoreErrorKind::Command(e.to_string())))?;

        debug!(wait_ms, "Reserved slot in counter store");
        Ok(u64::try_from(wait_ms).unwrap_or_default())
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
