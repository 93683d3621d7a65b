//! Pacer - distributed rate limiting and retry for rate-limited APIs
//!
//! Pacer keeps independent callers, in one process or many, from exceeding a
//! minimum interval between calls that share a rate-limit key, and retries
//! transient failures with backoff while failing fast on fatal ones.
//!
//! # Features
//!
//! - **Shared Limits**: Atomic slot reservation in Redis, or in memory for a
//!   single process
//! - **Fail-Open**: An unreachable store never blocks callers
//! - **Classified Retry**: Structured failure classes with a message-based
//!   fallback
//! - **Configuration**: Layered TOML and environment configuration
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pacer::{CallerConfig, PacerConfig, RateLimitedCaller, RateLimiter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PacerConfig::load()?;
//!     let limiter = RateLimiter::new(config.build_store());
//!
//!     let caller = RateLimitedCaller::new(
//!         CallerConfig::new("openai", "gpt-4o-mini").with_rate_limit_ms(500),
//!         limiter,
//!     );
//!
//!     let reply = caller
//!         .call(|| async { Ok::<_, String>("response".to_string()) })
//!         .await?;
//!     println!("{}", reply);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `pacer-error` - Error types and failure classification
//! - `pacer-core` - Rate-limit keys, retry options, telemetry
//! - `pacer-rate-limit` - Counter stores, limiter, retry policy, caller
//!
//! This crate (`pacer`) re-exports everything for convenience.

pub use pacer_core::*;
pub use pacer_error::*;
pub use pacer_rate_limit::*;
