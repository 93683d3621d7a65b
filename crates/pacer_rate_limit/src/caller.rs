//! Caller context combining the rate limiter and the retry policy.

use crate::{RateLimiter, RetryPolicy};
use pacer_core::{DEFAULT_KEY_PREFIX, RateLimitKey, RetryOptions};
use pacer_error::{RetryFailure, RetryableError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, instrument};

/// Per-caller settings for a rate-limited API client.
///
/// Rate limiting is opt-in: without `rate_limit_ms` (or with `0`) calls are
/// only retried, never throttled.
///
/// # Example
///
/// ```
/// use pacer_rate_limit::CallerConfig;
///
/// let config = CallerConfig::new("openai", "gpt-4o-mini").with_rate_limit_ms(250);
/// assert_eq!(config.key().as_str(), "pacer:openai:gpt-4o-mini");
///
/// let shared = config.clone().with_rate_limit_key("team:shared");
/// assert_eq!(shared.key().as_str(), "team:shared");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_setters::Setters,
)]
#[setters(prefix = "with_", strip_option)]
pub struct CallerConfig {
    /// Provider name, used in the derived key when no base URL is set
    #[setters(into)]
    provider: String,

    /// Model name
    #[setters(into)]
    model: String,

    /// Provider base URL, preferred over the provider name in the derived key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[setters(into)]
    base_url: Option<String>,

    /// Explicit key, used verbatim instead of the derived one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[setters(into)]
    rate_limit_key: Option<String>,

    /// Minimum milliseconds between calls sharing the key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rate_limit_ms: Option<u64>,

    /// Namespace prepended to derived keys
    #[serde(default = "default_key_prefix")]
    #[setters(into)]
    key_prefix: String,

    /// Retry behavior for each call
    #[serde(default = "RetryOptions::llm")]
    retry: RetryOptions,
}

fn default_key_prefix() -> String {
    DEFAULT_KEY_PREFIX.to_string()
}

impl CallerConfig {
    /// Settings for `model` on `provider`, with the LLM retry preset and no
    /// rate limit.
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            base_url: None,
            rate_limit_key: None,
            rate_limit_ms: None,
            key_prefix: default_key_prefix(),
            retry: RetryOptions::llm(),
        }
    }

    /// The key shared by every caller with the same settings.
    ///
    /// An explicit non-empty `rate_limit_key` wins. Otherwise the key is
    /// `"{key_prefix}:{base_url or provider}:{model}"`.
    pub fn key(&self) -> RateLimitKey {
        if let Some(key) = self.rate_limit_key.as_deref().filter(|key| !key.is_empty()) {
            return RateLimitKey::new(key);
        }
        let endpoint = self
            .base_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(&self.provider);
        RateLimitKey::for_model(&self.key_prefix, endpoint, &self.model)
    }

    /// Minimum distance between calls, if limiting is enabled.
    pub fn distance(&self) -> Option<Duration> {
        self.rate_limit_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}

/// Client-side wrapper that honors the shared rate limit before each call
/// and retries transient failures.
///
/// # Example
///
/// ```
/// use pacer_rate_limit::{CallerConfig, RateLimitedCaller, RateLimiter};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let config = CallerConfig::new("openai", "gpt-4o-mini").with_rate_limit_ms(100);
/// let caller = RateLimitedCaller::new(config, RateLimiter::in_memory());
///
/// let reply = caller
///     .call(|| async { Ok::<_, String>("hello".to_string()) })
///     .await
///     .unwrap();
/// assert_eq!(reply, "hello");
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RateLimitedCaller {
    config: CallerConfig,
    key: RateLimitKey,
    limiter: RateLimiter,
    policy: RetryPolicy,
}

impl RateLimitedCaller {
    /// Create a caller sharing `limiter` with every other caller in the process.
    pub fn new(config: CallerConfig, limiter: RateLimiter) -> Self {
        let key = config.key();
        let policy = RetryPolicy::new(*config.retry());
        debug!(key = %key, rate_limit_ms = ?config.rate_limit_ms(), "Created rate-limited caller");
        Self {
            config,
            key,
            limiter,
            policy,
        }
    }

    /// Settings this caller was built from.
    pub fn config(&self) -> &CallerConfig {
        &self.config
    }

    /// The rate-limit key this caller reserves slots under.
    pub fn key(&self) -> &RateLimitKey {
        &self.key
    }

    /// The retry policy applied to each call.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Wait for this caller's next slot. No-op when limiting is disabled.
    pub async fn honor_rate_limit(&self) {
        if let Some(distance) = self.config.distance() {
            self.limiter.wait(&self.key, distance).await;
        }
    }

    /// Honor the rate limit, then run `operation` under the retry policy.
    #[instrument(skip_all, fields(key = %self.key))]
    pub async fn call<F, Fut, T, E>(&self, operation: F) -> Result<T, RetryFailure<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: RetryableError + fmt::Display,
    {
        self.honor_rate_limit().await;
        self.policy.run(operation).await
    }
}
