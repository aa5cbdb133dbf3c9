//! Metrics helper structs for convenient metric recording

use std::time::Duration;

use prometheus::{Encoder, TextEncoder};

use super::{REQUESTS_TOTAL, REQUEST_DURATION, TOKEN_FETCH_DURATION};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording relay metrics
pub struct RelayMetrics;

impl RelayMetrics {
    /// Count a finished request under its outcome label
    pub fn record_outcome(outcome: &str) {
        REQUESTS_TOTAL.with_label_values(&[outcome]).inc();
    }

    pub fn observe_request(elapsed: Duration) {
        REQUEST_DURATION.observe(elapsed.as_secs_f64());
    }

    pub fn observe_token_fetch(elapsed: Duration) {
        TOKEN_FETCH_DURATION.observe(elapsed.as_secs_f64());
    }
}
