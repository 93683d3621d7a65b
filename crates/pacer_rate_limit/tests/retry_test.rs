//! Tests for the retry policy.

use pacer_core::{Backoff, RetryOptions};
use pacer_error::{FailureClass, OperationError, RetryFailure};
use pacer_rate_limit::RetryPolicy;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// Records when each attempt started.
#[derive(Clone, Default)]
struct AttemptLog {
    started: Arc<Mutex<Vec<Instant>>>,
}

impl AttemptLog {
    fn record(&self) -> usize {
        let mut started = self.started.lock().unwrap();
        started.push(Instant::now());
        started.len()
    }

    fn count(&self) -> usize {
        self.started.lock().unwrap().len()
    }

    fn gaps(&self) -> Vec<Duration> {
        let started = self.started.lock().unwrap();
        started.windows(2).map(|pair| pair[1] - pair[0]).collect()
    }
}

fn assert_gaps(actual: &[Duration], expected_ms: &[u64]) {
    assert_eq!(actual.len(), expected_ms.len(), "gaps: {:?}", actual);
    for (gap, expected) in actual.iter().zip(expected_ms) {
        let expected = Duration::from_millis(*expected);
        assert!(
            *gap >= expected && *gap < expected + Duration::from_millis(10),
            "expected ~{:?}, got {:?}",
            expected,
            gap
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_fatal_error_is_not_retried() {
    let policy = RetryPolicy::new(RetryOptions::default());
    let calls = Arc::new(AtomicU32::new(0));

    let start = Instant::now();
    let result = policy
        .run(|| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>("invalid api key".to_string())
            }
        })
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
    match result {
        Err(RetryFailure::Fatal(e)) => assert_eq!(e, "invalid api key"),
        other => panic!("expected fatal failure, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_retryable_error_exhausts_budget() {
    let policy = RetryPolicy::new(RetryOptions::default().with_max_retries(3));
    let log = AttemptLog::default();

    let result = policy
        .run(|| {
            let log = log.clone();
            async move {
                log.record();
                Err::<(), _>("request timeout".to_string())
            }
        })
        .await;

    assert_eq!(log.count(), 4);
    match result {
        Err(RetryFailure::Exhausted(exhausted)) => {
            assert_eq!(exhausted.attempts(), 4);
            assert_eq!(exhausted.last_error(), "request timeout");
            assert_eq!(
                exhausted.message(),
                "Operation failed after 4 attempts: request timeout"
            );
        }
        other => panic!("expected exhaustion, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_exponential_backoff_schedule() {
    let options = RetryOptions::new(3, Duration::from_millis(1000), Backoff::Exponential);
    let policy = RetryPolicy::new(options);
    let log = AttemptLog::default();

    let _ = policy
        .run(|| {
            let log = log.clone();
            async move {
                log.record();
                Err::<(), _>("503 service unavailable".to_string())
            }
        })
        .await;

    assert_gaps(&log.gaps(), &[1000, 2000, 4000]);
}

#[tokio::test(start_paused = true)]
async fn test_linear_backoff_schedule() {
    let options = RetryOptions::new(3, Duration::from_millis(1000), Backoff::Linear);
    let policy = RetryPolicy::new(options);
    let log = AttemptLog::default();

    let _ = policy
        .run(|| {
            let log = log.clone();
            async move {
                log.record();
                Err::<(), _>("connection reset".to_string())
            }
        })
        .await;

    assert_gaps(&log.gaps(), &[1000, 2000, 3000]);
}

#[tokio::test(start_paused = true)]
async fn test_success_after_one_retry() {
    let policy = RetryPolicy::new(RetryOptions::default());
    let log = AttemptLog::default();

    let start = Instant::now();
    let result = policy
        .run(|| {
            let log = log.clone();
            async move {
                match log.record() {
                    1 => Err("Unexpected end of JSON input".to_string()),
                    n => Ok(n),
                }
            }
        })
        .await;

    assert_eq!(result.unwrap(), 2);
    assert_eq!(log.count(), 2);

    // Only the single 1000ms backoff elapsed
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(1000) && elapsed < Duration::from_millis(1010));
}

#[tokio::test(start_paused = true)]
async fn test_immediate_success_makes_one_call() {
    let policy = RetryPolicy::llm();
    let calls = Arc::new(AtomicU32::new(0));

    let value = policy
        .run(|| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>("facts")
            }
        })
        .await
        .unwrap();

    assert_eq!(value, "facts");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_fatal_error_after_retry_stops_immediately() {
    let policy = RetryPolicy::new(RetryOptions::default().with_max_retries(5));
    let log = AttemptLog::default();

    let result = policy
        .run(|| {
            let log = log.clone();
            async move {
                match log.record() {
                    1 => Err::<(), _>("rate limit exceeded".to_string()),
                    _ => Err("permission denied".to_string()),
                }
            }
        })
        .await;

    assert_eq!(log.count(), 2);
    let failure = result.unwrap_err();
    assert!(!failure.is_exhausted());
    assert_eq!(failure.into_error(), "permission denied");
}

#[tokio::test(start_paused = true)]
async fn test_zero_retries_runs_once() {
    let policy = RetryPolicy::new(RetryOptions::default().with_max_retries(0));
    let calls = Arc::new(AtomicU32::new(0));

    let result = policy
        .run(|| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>("network unreachable".to_string())
            }
        })
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(result.unwrap_err().attempts(), Some(1));
}

#[tokio::test(start_paused = true)]
async fn test_llm_preset_schedule() {
    let policy = RetryPolicy::llm();
    let log = AttemptLog::default();

    let result = policy
        .run(|| {
            let log = log.clone();
            async move {
                log.record();
                Err::<(), _>("bad gateway".to_string())
            }
        })
        .await;

    assert_eq!(result.unwrap_err().attempts(), Some(6));
    assert_gaps(&log.gaps(), &[500, 1000, 2000, 4000, 8000]);
}

#[tokio::test(start_paused = true)]
async fn test_structured_errors_override_message() {
    let policy = RetryPolicy::new(RetryOptions::default().with_max_retries(2));
    let calls = Arc::new(AtomicU32::new(0));

    // The text mentions a timeout, but the explicit class says fatal
    let result = policy
        .run(|| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(OperationError::fatal("schema timeout field missing"))
            }
        })
        .await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(matches!(result, Err(RetryFailure::Fatal(_))));

    let calls = Arc::new(AtomicU32::new(0));
    let result = policy
        .run(|| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(OperationError::new(FailureClass::RateLimited, "quota"))
            }
        })
        .await;
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(result.unwrap_err().attempts(), Some(3));
}

#[tokio::test(start_paused = true)]
async fn test_io_errors_classified_by_kind() {
    let policy = RetryPolicy::new(RetryOptions::default().with_max_retries(1));
    let calls = Arc::new(AtomicU32::new(0));

    let result = policy
        .run(|| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(std::io::Error::new(std::io::ErrorKind::TimedOut, "deadline"))
            }
        })
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(result.unwrap_err().is_exhausted());
}
