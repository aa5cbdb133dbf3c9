use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use thiserror::Error;

use crate::auth::AuthError;
use crate::config::UpstreamStatusPolicy;
use crate::relay::RelayResult;
use crate::telemetry::TelemetryError;

/// Startup and wiring failures. Never reaches an HTTP client.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Credential configuration error: {0}")]
    Credentials(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Failures of a single relay request.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Failed to obtain access token: {0}")]
    Auth(String),

    #[error("FCM returned {status}")]
    Upstream { status: StatusCode, body: Value },

    #[error("{0}")]
    Transport(String),
}

impl RelayError {
    pub fn missing_fields() -> Self {
        RelayError::Validation("Missing required fields".to_string())
    }

    /// Short label used in logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::Validation(_) | RelayError::PayloadTooLarge(_) => "validation",
            RelayError::Auth(_) => "auth",
            RelayError::Upstream { .. } => "upstream",
            RelayError::Transport(_) => "transport",
        }
    }

    pub fn status_code(&self, policy: UpstreamStatusPolicy) -> StatusCode {
        match self {
            RelayError::Validation(_) => StatusCode::BAD_REQUEST,
            RelayError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::Upstream { status, .. } if policy == UpstreamStatusPolicy::Forward => {
                *status
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Value placed in the `error` field of the failure envelope
    pub fn error_value(&self) -> Value {
        match self {
            RelayError::Upstream { body, .. } => body.clone(),
            other => Value::String(other.to_string()),
        }
    }
}

impl From<AuthError> for RelayError {
    fn from(err: AuthError) -> Self {
        RelayError::Auth(err.to_string())
    }
}

/// A relay failure paired with the deployment's upstream status policy.
pub struct RelayRejection {
    pub error: RelayError,
    pub policy: UpstreamStatusPolicy,
}

impl RelayRejection {
    pub fn new(error: RelayError, policy: UpstreamStatusPolicy) -> Self {
        Self { error, policy }
    }
}

impl IntoResponse for RelayRejection {
    fn into_response(self) -> Response {
        let status = self.error.status_code(self.policy);

        if status.is_server_error() {
            tracing::error!(
                kind = self.error.kind(),
                status = %status.as_u16(),
                message = %self.error,
                "Relay request failed"
            );
        } else {
            tracing::warn!(
                kind = self.error.kind(),
                status = %status.as_u16(),
                message = %self.error,
                "Relay request rejected"
            );
        }

        let body = RelayResult::failure(self.error.error_value());

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
