use tracing::{error, info};

/// Resolves once Ctrl+C is received.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("🛑 Shutdown signal received (Ctrl+C)."),
        Err(e) => error!("Failed to listen for shutdown signal: {e}"),
    }
}
