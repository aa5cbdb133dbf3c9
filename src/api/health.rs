//! Liveness endpoint.

use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    /// RFC 3339 UTC timestamp with millisecond precision
    pub time: String,
}

/// GET / - always OK while the process is serving
pub async fn health() -> Json<HealthResponse> {
    tracing::debug!("Health check endpoint hit");

    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Server is running".to_string(),
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
