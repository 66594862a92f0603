//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by method, status, outcome
//! - `http_request_duration_seconds` (histogram): latency by method, outcome
//!
//! `outcome` is the stage that settled the request (`dispatched`,
//! `https_redirection`, `route_dispatch` for misses, ...).

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder};

pub const REQUESTS_TOTAL: &str = "http_requests_total";
pub const REQUEST_DURATION: &str = "http_request_duration_seconds";

const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets_for_metric(Matcher::Full(REQUEST_DURATION.to_string()), LATENCY_BUCKETS)?
        .install()?;

    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, outcome: &str, start: Instant) {
    ::metrics::counter!(
        REQUESTS_TOTAL,
        "method" => method.to_string(),
        "status" => status.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);

    ::metrics::histogram!(
        REQUEST_DURATION,
        "method" => method.to_string(),
        "outcome" => outcome.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
