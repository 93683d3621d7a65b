//! Tests for retry options and rate-limit keys.

use pacer_core::{Backoff, DEFAULT_KEY_PREFIX, RateLimitKey, RetryOptions};
use std::str::FromStr;
use std::time::Duration;

#[test]
fn test_default_options() {
    let options = RetryOptions::default();
    assert_eq!(*options.max_retries(), 3);
    assert_eq!(*options.delay(), Duration::from_millis(1000));
    assert_eq!(*options.backoff(), Backoff::Exponential);
    assert_eq!(options.max_attempts(), 4);
}

#[test]
fn test_llm_preset() {
    let options = RetryOptions::llm();
    assert_eq!(*options.max_retries(), 5);
    assert_eq!(*options.delay(), Duration::from_millis(500));
    assert_eq!(*options.backoff(), Backoff::Exponential);
}

#[test]
fn test_exponential_schedule() {
    let schedule: Vec<_> = RetryOptions::default().schedule().collect();
    assert_eq!(
        schedule,
        vec![
            Duration::from_millis(1000),
            Duration::from_millis(2000),
            Duration::from_millis(4000),
        ]
    );
}

#[test]
fn test_linear_schedule() {
    let options = RetryOptions::default().with_backoff(Backoff::Linear);
    let schedule: Vec<_> = options.schedule().collect();
    assert_eq!(
        schedule,
        vec![
            Duration::from_millis(1000),
            Duration::from_millis(2000),
            Duration::from_millis(3000),
        ]
    );
}

#[test]
fn test_zero_retries_has_empty_schedule() {
    let options = RetryOptions::default().with_max_retries(0);
    assert_eq!(options.schedule().count(), 0);
    assert_eq!(options.max_attempts(), 1);
}

#[test]
fn test_exponential_delay_saturates() {
    let delay = Backoff::Exponential.delay_for(Duration::from_millis(500), 64);
    assert_eq!(delay, Duration::from_millis(500).saturating_mul(u32::MAX));
}

#[test]
fn test_validate_rejects_zero_delay() {
    let options = RetryOptions::default().with_delay(Duration::ZERO);
    let err = options.validate().unwrap_err();
    assert!(err.message.contains("must be positive"));
    assert!(err.file.ends_with("options_test.rs"));
    assert!(RetryOptions::default().validate().is_ok());
}

#[test]
fn test_options_from_toml() {
    let options: RetryOptions = toml::from_str(
        r#"
max_retries = 2
delay_ms = 250
backoff = "linear"
"#,
    )
    .unwrap();

    assert_eq!(
        options,
        RetryOptions::new(2, Duration::from_millis(250), Backoff::Linear)
    );
}

#[test]
fn test_options_from_partial_toml_uses_defaults() {
    let options: RetryOptions = toml::from_str("backoff = \"linear\"").unwrap();
    assert_eq!(*options.max_retries(), 3);
    assert_eq!(*options.delay(), Duration::from_millis(1000));
}

#[test]
fn test_backoff_parses_from_str() {
    assert_eq!(Backoff::from_str("linear").unwrap(), Backoff::Linear);
    assert_eq!(Backoff::from_str("exponential").unwrap(), Backoff::Exponential);
    assert!(Backoff::from_str("fibonacci").is_err());
    assert_eq!(Backoff::Linear.to_string(), "linear");
}

#[test]
fn test_key_derivation() {
    let key = RateLimitKey::for_model(DEFAULT_KEY_PREFIX, "https://api.openai.com/v1", "gpt-4o");
    assert_eq!(key.as_str(), "pacer:https://api.openai.com/v1:gpt-4o");
}

#[test]
fn test_key_conversions() {
    let from_str: RateLimitKey = "shared".into();
    let from_string: RateLimitKey = "shared".to_string().into();
    assert_eq!(from_str, from_string);
    assert_eq!(from_str.as_ref(), "shared");
}
