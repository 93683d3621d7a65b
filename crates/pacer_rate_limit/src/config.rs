//! Configuration for the counter store and default retry behavior.
//!
//! This module provides TOML-based configuration. The configuration system
//! supports:
//! - Bundled defaults (include_str! from pacer.toml)
//! - User overrides (./pacer.toml or ~/.config/pacer/pacer.toml)
//! - `PACER_*` environment variables, and `REDIS_URL` for the store endpoint

use crate::{
    CallerConfig, CounterStore, InMemoryCounterStore, REDIS_URL_ENV, RedisCounterStore,
};
use config::{Config, Environment, File, FileFormat};
use pacer_core::{DEFAULT_KEY_PREFIX, RetryOptions};
use pacer_error::{ConfigError, PacerError, PacerResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Which counter store implementation to construct.
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
pub enum StoreBackend {
    /// Shared Redis instance; limits hold across processes
    #[default]
    Redis,
    /// In-process map; limits hold within this process only
    Memory,
}

/// Counter store settings.
///
/// ```toml
/// [store]
/// backend = "redis"
/// url = "redis://localhost:6379"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Store implementation
    #[serde(default)]
    pub backend: StoreBackend,

    /// Redis endpoint, ignored by the memory backend
    #[serde(default = "default_store_url")]
    pub url: String,
}

fn default_store_url() -> String {
    crate::DEFAULT_REDIS_URL.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: default_store_url(),
        }
    }
}

/// Rate-limit key settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RateLimitSettings {
    /// Namespace prepended to derived keys
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

fn default_key_prefix() -> String {
    DEFAULT_KEY_PREFIX.to_string()
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
        }
    }
}

/// Top-level Pacer configuration.
///
/// Loads configuration with a precedence system (later sources override
/// earlier ones):
/// 1. Bundled defaults (pacer.toml shipped with the library)
/// 2. User config in home directory (~/.config/pacer/pacer.toml)
/// 3. User config in current directory (./pacer.toml)
/// 4. `PACER_*` environment variables, `__` separating sections
/// 5. `REDIS_URL` for `store.url`
///
/// # Example
///
/// ```no_run
/// use pacer_rate_limit::PacerConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = PacerConfig::load()?;
/// let store = config.build_store();
/// println!("Using {} counter store", store.backend());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct PacerConfig {
    /// Counter store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Retry options applied by [`PacerConfig::caller`]
    #[serde(default)]
    pub retry: RetryOptions,

    /// Key settings applied by [`PacerConfig::caller`]
    #[serde(default)]
    pub rate_limit: RateLimitSettings,
}

impl PacerConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// retry options are invalid.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> PacerResult<Self> {
        debug!("Loading configuration from file");

        let config: Self = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                PacerError::from(ConfigError::for_path(
                    &path,
                    format!("Failed to read configuration: {}", e),
                ))
            })?
            .try_deserialize()
            .map_err(|e| {
                PacerError::from(ConfigError::for_path(
                    &path,
                    format!("Failed to parse configuration: {}", e),
                ))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with precedence: environment > current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if any present source cannot be parsed.
    #[instrument]
    pub fn load() -> PacerResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        const DEFAULT_CONFIG: &str = include_str!("../pacer.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/pacer/pacer.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("pacer").required(false))
            .add_source(
                Environment::with_prefix("PACER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("store.url", std::env::var(REDIS_URL_ENV).ok())
            .map_err(|e| {
                PacerError::from(ConfigError::new(format!(
                    "Failed to apply {} override: {}",
                    REDIS_URL_ENV, e
                )))
            })?;

        let config: Self = builder
            .build()
            .map_err(|e| {
                PacerError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                PacerError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Check values that deserialize fine but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns an error if the default retry delay is zero.
    pub fn validate(&self) -> PacerResult<()> {
        self.retry.validate()?;
        Ok(())
    }

    /// Caller settings for `model` on `provider` carrying the configured
    /// retry options and key prefix.
    ///
    /// ```
    /// use pacer_rate_limit::PacerConfig;
    ///
    /// let mut config = PacerConfig::default();
    /// config.rate_limit.key_prefix = "staging".to_string();
    ///
    /// let caller = config.caller("openai", "gpt-4o-mini");
    /// assert_eq!(caller.key().as_str(), "staging:openai:gpt-4o-mini");
    /// assert_eq!(caller.retry(), &config.retry);
    /// ```
    pub fn caller(&self, provider: impl Into<String>, model: impl Into<String>) -> CallerConfig {
        CallerConfig::new(provider, model)
            .with_retry(self.retry)
            .with_key_prefix(self.rate_limit.key_prefix.clone())
    }

    /// Construct the configured counter store.
    ///
    /// Never fails: an unusable Redis URL produces a store whose reservations
    /// fail open.
    pub fn build_store(&self) -> Arc<dyn CounterStore> {
        info!(backend = %self.store.backend, "Building counter store");
        match self.store.backend {
            StoreBackend::Redis => Arc::new(RedisCounterStore::new(self.store.url.clone())),
            StoreBackend::Memory => Arc::new(InMemoryCounterStore::new()),
        }
    }
}
