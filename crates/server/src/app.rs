//! Process startup: build state, bind, serve until a shutdown signal.

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use crate::config::Settings;
use crate::error::ServerError;
use crate::orchestrator::ZodiacOrchestrator;
use crate::routes::build_router;
use crate::state::AppState;

/// Run the HTTP service with the given settings.
pub async fn serve(settings: Settings) -> Result<(), ServerError> {
    let orchestrator = ZodiacOrchestrator::from_settings(&settings)?;
    info!(
        signs = orchestrator.catalog().len(),
        enrichment = settings.enrichment_enabled(),
        "Orchestrator ready"
    );

    let bind_addr = format!("0.0.0.0:{}", settings.http_port);
    let state = AppState::new(orchestrator, settings);
    let app = build_router(state)?;

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| ServerError::Bind {
            address: bind_addr.clone(),
            source: e,
        })?;
    info!("Listening on {}", listener.local_addr()?);
    info!("Endpoints:");
    info!("  - GET     /            (greeting)");
    info!("  - GET     /health      (health check)");
    info!("  - GET     /signs       (sign catalog)");
    info!("  - POST    /get-zodiac  (reading)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for SIGTERM or SIGINT (Ctrl+C).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, initiating graceful shutdown"),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
    }
}
