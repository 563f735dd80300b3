//! Graceful shutdown signal handling.
//!
//! SIGTERM/SIGINT stop the listener and drain in-flight connections; the
//! serve loop then completes without an error, which the lifecycle treats
//! as a clean exit rather than a failure.

use std::time::Duration;

use axum_server::Handle;

/// Connection drain window after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// Setup graceful shutdown on SIGTERM and SIGINT.
///
/// When either signal is received, the server stops accepting new
/// connections, waits for existing ones to complete, and shuts down.
pub fn setup_shutdown_handler(handle: Handle) {
    tokio::spawn(async move {
        let ctrl_c = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                tracing::info!("Received Ctrl+C, initiating graceful shutdown");
            }
            _ = terminate => {
                tracing::info!("Received SIGTERM, initiating graceful shutdown");
            }
        }

        handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
    });
}
