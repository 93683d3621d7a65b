//! Tracing and OpenTelemetry setup.
//!
//! [`init_telemetry`] installs one global `tracing` subscriber that writes
//! human-readable logs and forwards spans to an OpenTelemetry tracer provider.
//! The provider is also registered as the OpenTelemetry global, so
//! [`shutdown_telemetry`] flushes it.

use opentelemetry::KeyValue;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::{
    Resource,
    trace::{RandomIdGenerator, Sampler, TracerProvider},
};
use opentelemetry_stdout::SpanExporter;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// `service.name` reported on every exported span.
pub const SERVICE_NAME: &str = "pacer";

fn tracer_provider() -> TracerProvider {
    let resource = Resource::default().merge(&Resource::new([KeyValue::new(
        "service.name",
        SERVICE_NAME,
    )]));

    TracerProvider::builder()
        .with_simple_exporter(SpanExporter::default())
        .with_id_generator(RandomIdGenerator::default())
        .with_sampler(Sampler::AlwaysOn)
        .with_resource(resource)
        .build()
}

/// Initialize tracing with an OpenTelemetry stdout exporter.
///
/// Retry warnings and fail-open errors from the rate limiter are logged
/// through the fmt layer; spans such as each `call` and `reserve` go to the
/// exporter. Both layers respect `RUST_LOG`.
///
/// # Errors
///
/// Returns error if a global subscriber is already installed. The
/// OpenTelemetry global provider is left untouched in that case.
pub fn init_telemetry() -> Result<(), Box<dyn std::error::Error>> {
    let provider = tracer_provider();

    let telemetry_layer = tracing_opentelemetry::layer()
        .with_tracer(provider.tracer(SERVICE_NAME))
        .with_filter(EnvFilter::from_default_env());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_filter(EnvFilter::from_default_env());

    tracing_subscriber::registry()
        .with(telemetry_layer)
        .with(fmt_layer)
        .try_init()?;

    opentelemetry::global::set_tracer_provider(provider);

    tracing::debug!(service = SERVICE_NAME, "Telemetry initialized");
    Ok(())
}

/// Flush pending spans and shut down the global tracer provider.
///
/// Call this before application exit. Spans started afterwards are dropped.
pub fn shutdown_telemetry() {
    opentelemetry::global::shutdown_tracer_provider();
}
