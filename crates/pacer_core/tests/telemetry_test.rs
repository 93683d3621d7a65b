//! Tests for telemetry initialization.
//!
//! Global state is process-wide, so everything runs in a single test.

use opentelemetry::global;
use opentelemetry::trace::{Span, Tracer};
use pacer_core::{init_telemetry, shutdown_telemetry};

#[test]
fn test_telemetry_lifecycle() {
    // Before init the global provider is a no-op
    let span = global::tracer("before").start("before-init");
    assert!(!span.span_context().is_valid());

    init_telemetry().expect("first initialization succeeds");
    tracing::info!("telemetry test event");

    // The SDK provider is now the global one and samples everything
    let mut span = global::tracer("during").start("during-init");
    assert!(span.span_context().is_valid());
    assert!(span.span_context().is_sampled());
    span.end();

    // A global subscriber is already installed
    assert!(init_telemetry().is_err());
    let span = global::tracer("still").start("after-second-init");
    assert!(span.span_context().is_valid());

    shutdown_telemetry();

    // Shutdown swaps the global back to a no-op provider
    let span = global::tracer("after").start("after-shutdown");
    assert!(!span.span_context().is_valid());
}
