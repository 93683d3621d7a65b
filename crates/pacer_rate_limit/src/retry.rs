//! Retry policy with classified failures and a bounded backoff schedule.

use pacer_core::RetryOptions;
use pacer_error::{RetryExhausted, RetryFailure, RetryableError};
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, instrument, warn};

/// Re-invokes a failing operation according to [`RetryOptions`].
///
/// Each failure is classified through [`RetryableError`]:
/// - fatal errors are returned at once as [`RetryFailure::Fatal`], whatever
///   budget remains
/// - retryable errors sleep for the scheduled delay and try again, up to
///   `max_retries` times
/// - a retryable error on the last attempt becomes
///   [`RetryFailure::Exhausted`] carrying the attempt count
///
/// # Example
///
/// ```
/// use pacer_core::RetryOptions;
/// use pacer_rate_limit::RetryPolicy;
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let policy = RetryPolicy::new(RetryOptions::default().with_delay(Duration::from_millis(1)));
///
/// let answer = policy
///     .run(|| async { Ok::<_, String>(42) })
///     .await
///     .unwrap();
/// assert_eq!(answer, 42);
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    options: RetryOptions,
}

impl RetryPolicy {
    /// Create a policy from options.
    pub fn new(options: RetryOptions) -> Self {
        Self { options }
    }

    /// Policy tuned for LLM API calls: 5 retries, 500ms, exponential.
    pub fn llm() -> Self {
        Self::new(RetryOptions::llm())
    }

    /// The options driving this policy.
    pub fn options(&self) -> &RetryOptions {
        &self.options
    }

    /// Run `operation` until it succeeds, fails fatally, or the budget runs out.
    ///
    /// `operation` is called once per attempt and must build a fresh future
    /// each time.
    #[instrument(skip_all, fields(max_retries = *self.options.max_retries()))]
    pub async fn run<F, Fut, T, E>(&self, mut operation: F) -> Result<T, RetryFailure<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: RetryableError + fmt::Display,
    {
        let options = self.options;
        let max_retries = *options.max_retries();
        let attempts = AtomicU32::new(0);

        let outcome = Retry::spawn(options.schedule(), || {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst);
            let pending = operation();
            async move {
                match pending.await {
                    Ok(value) => Ok(value),
                    Err(e) => {
                        let class = e.failure_class();
                        if !class.is_retryable() {
                            debug!(attempt = attempt + 1, error = %e, "Fatal error, not retrying");
                            return Err(RetryError::Permanent(e));
                        }
                        if attempt < max_retries {
                            warn!(
                                attempt = attempt + 1,
                                max_retries,
                                delay_ms = options.delay_for(attempt).as_millis() as u64,
                                class = %class,
                                error = %e,
                                "Transient error, will retry"
                            );
                        }
                        Err(RetryError::Transient {
                            err: e,
                            retry_after: None,
                        })
                    }
                }
            }
        })
        .await;

        outcome.map_err(|e| {
            if e.is_retryable() {
                let attempts = attempts.load(Ordering::SeqCst);
                warn!(attempts, error = %e, "Retries exhausted");
                RetryFailure::Exhausted(RetryExhausted::new(e, attempts))
            } else {
                RetryFailure::Fatal(e)
            }
        })
    }
}

impl From<RetryOptions> for RetryPolicy {
    fn from(options: RetryOptions) -> Self {
        Self::new(options)
    }
}
