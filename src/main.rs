use anyhow::Result;
use tokio::net::TcpListener;
use tokio::signal;

use fcm_relay_service::auth::CredentialSource;
use fcm_relay_service::config::Settings;
use fcm_relay_service::error::AppError;
use fcm_relay_service::server::{create_app, AppState};
use fcm_relay_service::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::new().map_err(AppError::from)?;

    // Initialize tracing
    let _telemetry = init_telemetry(&settings.otel).map_err(AppError::from)?;
    tracing::info!("Configuration loaded");

    // Credentials are read per request; check them once now so a bad key shows up early.
    let source = CredentialSource::from_config(&settings.firebase)?;
    match source.load().await {
        Ok(key) => tracing::info!(
            source = source.kind(),
            client_email = %key.client_email,
            "Service account credential loaded"
        ),
        Err(e) => tracing::warn!(
            source = source.kind(),
            error = %e,
            "Service account credential cannot be loaded yet; requests will fail until fixed"
        ),
    }

    // Create application state
    let state = AppState::new(settings.clone())?;
    tracing::info!(
        project_id = %settings.firebase.project_id,
        include_data = settings.relay.include_data,
        upstream_status = ?settings.relay.upstream_status,
        "Application state initialized"
    );

    // Create Axum app
    let app = create_app(state);

    // Start server
    let addr = settings.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal_handler())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal_handler() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
