use axum::{
    routing::{get, post},
    Router,
};

use crate::server::AppState;

use super::{health, prometheus_metrics, send_notification};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health & Metrics
        .route("/", get(health))
        .route("/metrics", get(prometheus_metrics))
        // Notification relay
        .route("/send-notification", post(send_notification))
}
