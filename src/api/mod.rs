//! HTTP API for Renewal Desk.
//!
//! ## Endpoints
//!
//! - `GET /api/health` - Health check
//! - `POST /api/tasks/status` - Change a task's status and resolve dependents
//! - `GET /api/companies/{company_id}/tasks` - List a company's tasks
//! - `POST /api/companies/{company_id}/renewals` - Create a renewal workflow

mod routes;
mod types;

pub use routes::{SharedWorkflow, router};
pub use types::{
    ApiError, CreateRenewalBody, HealthResponse, RenewalCreatedResponse, StatusUpdateResponse,
    UpdateStatusBody,
};

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

/// Serves `app` on `listener` until Ctrl+C or `SIGTERM`.
///
/// # Errors
///
/// Returns the I/O error that stopped the server.
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "renewal desk listening");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received");
}
