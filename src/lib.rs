// Shared infrastructure
pub mod config;
pub mod error;
pub mod metrics;
pub mod telemetry;

// Domain
pub mod auth;
pub mod relay;

// Application layer
pub mod api;
pub mod server;
