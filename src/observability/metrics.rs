//! Process-level telemetry via the `metrics` facade.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): logical calls by endpoint, outcome
//! - `gateway_request_duration_seconds` (histogram): end-to-end latency
//! - `gateway_rejected_total` (counter): gate rejections by endpoint, reason
//! - `gateway_upstream_health` (gauge): 1=healthy, 0=unhealthy

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address.
///
/// Optional: the facade macros are no-ops until a recorder is
/// installed, so library consumers that scrape elsewhere can skip this.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record the final outcome of one logical call.
pub fn record_request(endpoint: &str, outcome: &'static str, started: Instant) {
    metrics::counter!(
        "gateway_requests_total",
        "endpoint" => endpoint.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!(
        "gateway_request_duration_seconds",
        "endpoint" => endpoint.to_string()
    )
    .record(started.elapsed().as_secs_f64());
}

/// Record a call rejected before any network attempt.
pub fn record_rejected(endpoint: &str, reason: &'static str) {
    metrics::counter!(
        "gateway_rejected_total",
        "endpoint" => endpoint.to_string(),
        "reason" => reason
    )
    .increment(1);
}

/// Record the health probe result for an endpoint.
pub fn record_upstream_health(endpoint: &str, healthy: bool) {
    metrics::gauge!(
        "gateway_upstream_health",
        "endpoint" => endpoint.to_string()
    )
    .set(if healthy { 1.0 } else { 0.0 });
}
