//! Notification relay endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::error::{RelayError, RelayRejection};
use crate::metrics::RelayMetrics;
use crate::relay::{NotificationRequest, RelayResult};
use crate::server::AppState;

/// POST /send-notification - forward one notification to FCM
#[tracing::instrument(name = "http.send_notification", skip(state, payload))]
pub async fn send_notification(
    State(state): State<AppState>,
    payload: Result<Json<NotificationRequest>, JsonRejection>,
) -> Result<Json<RelayResult>, RelayRejection> {
    let policy = state.settings.relay.upstream_status;

    let Json(request) = payload.map_err(|rejection| {
        RelayMetrics::record_outcome("validation");
        let message = format!("Invalid request body: {}", rejection.body_text());
        // Over the body limit, with or without a Content-Length header
        let error = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            RelayError::PayloadTooLarge(message)
        } else {
            RelayError::Validation(message)
        };
        RelayRejection::new(error, policy)
    })?;

    let data = state
        .relay
        .send(request)
        .await
        .map_err(|e| RelayRejection::new(e, policy))?;

    Ok(Json(RelayResult::success(data)))
}
