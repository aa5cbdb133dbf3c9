//! API layer - HTTP endpoint handlers.

mod health;
mod metrics;
mod notifications;
mod routes;

pub use health::{health, HealthResponse};
pub use metrics::prometheus_metrics;
pub use notifications::send_notification;
pub use routes::api_routes;
