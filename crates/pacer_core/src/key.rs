//! Rate-limit key derivation.

use serde::{Deserialize, Serialize};

/// Prefix used when deriving keys without an explicit namespace.
pub const DEFAULT_KEY_PREFIX: &str = "pacer";

/// Identity scoping a shared minimum-interval limit.
///
/// Every caller that should share a limit must build the same key. Keys carry
/// no tenant isolation beyond the prefix, so two unrelated systems sharing a
/// store should pick distinct prefixes.
///
/// # Examples
///
/// ```
/// use pacer_core::RateLimitKey;
///
/// let key = RateLimitKey::for_model("pacer", "openai", "gpt-4o-mini");
/// assert_eq!(key.as_str(), "pacer:openai:gpt-4o-mini");
///
/// let explicit = RateLimitKey::new("team-a:shared");
/// assert_eq!(explicit.to_string(), "team-a:shared");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct RateLimitKey(String);

impl RateLimitKey {
    /// Use `key` verbatim.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Derive `"{prefix}:{endpoint}:{model}"`.
    ///
    /// `endpoint` is the provider's base URL when one is configured, or the
    /// provider name otherwise.
    pub fn for_model(prefix: &str, endpoint: &str, model: &str) -> Self {
        Self(format!("{}:{}:{}", prefix, endpoint, model))
    }

    /// The key as sent to the counter store.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RateLimitKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl AsRef<str> for RateLimitKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
