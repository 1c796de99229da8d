//! Metrics collection and exposition.
//!
//! # Metrics
//! - `cep_requests_total` (counter): handled requests by service, status
//! - `cep_lookup_duration_seconds` (histogram): provider latency by provider, outcome
//!
//! # Design Decisions
//! - Recording without an installed recorder is a no-op
//! - Prometheus endpoint is opt-in so both services can share a host

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Count a finished request.
pub fn record_request(service: &'static str, status: u16) {
    metrics::counter!(
        "cep_requests_total",
        "service" => service,
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record how long a provider lookup took.
pub fn record_lookup(provider: &'static str, outcome: &'static str, started: Instant) {
    metrics::histogram!(
        "cep_lookup_duration_seconds",
        "provider" => provider,
        "outcome" => outcome
    )
    .record(started.elapsed().as_secs_f64());
}
