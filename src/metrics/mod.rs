//! Prometheus metrics for the relay.
//!
//! - Request outcomes (success, validation, auth, upstream, transport)
//! - End-to-end relay latency
//! - Access-token fetch latency

mod helpers;

pub use helpers::{encode_metrics, RelayMetrics};

use lazy_static::lazy_static;
use prometheus::{register_histogram, register_int_counter_vec, Histogram, IntCounterVec};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "fcm_relay";

lazy_static! {
    /// Relay requests by outcome
    pub static ref REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_requests_total", METRIC_PREFIX),
        "Total notification relay requests by outcome",
        &["outcome"]
    ).unwrap();

    /// Time from request receipt to a final outcome
    pub static ref REQUEST_DURATION: Histogram = register_histogram!(
        format!("{}_request_duration_seconds", METRIC_PREFIX),
        "Notification relay latency in seconds",
        vec![0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    ).unwrap();

    /// Time spent obtaining an OAuth access token
    pub static ref TOKEN_FETCH_DURATION: Histogram = register_histogram!(
        format!("{}_token_fetch_duration_seconds", METRIC_PREFIX),
        "Access token acquisition latency in seconds",
        vec![0.001, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    ).unwrap();
}
