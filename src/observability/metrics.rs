//! Metrics collection and exposition.
//!
//! # Metrics
//! - `fib_requests_total` (counter): requests by method, route, status
//! - `fib_request_duration_seconds` (histogram): latency distribution
//! - `fib_rate_limited_total` (counter): rejections by violated rule
//!
//! # Design Decisions
//! - Prometheus exporter on its own listener, kept off the service router
//!   so it is never subject to admission control
//! - Metric updates are cheap atomic operations

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install Prometheus exporter"),
    }
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    counter!(
        "fib_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!("fib_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record one rate-limited rejection.
pub fn record_rate_limited(rule: &str) {
    counter!("fib_rate_limited_total", "rule" => rule.to_string()).increment(1);
}
