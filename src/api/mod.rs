//! REST API over one computed project.
//!
//! Provides three GET endpoints:
//! - `/design`: array configuration, safety verdict, inverter groups
//! - `/simulation`: economic summary and KPIs
//! - `/yearly`: yearly cash flow with optional year-range filtering

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::config::ProjectConfig;
use crate::pipeline::ProjectResult;

/// Immutable application state shared across all request handlers.
///
/// Built once after the pipeline run and wrapped in `Arc`; all data is
/// read-only, so no locks are needed.
pub struct AppState {
    /// Inputs of the run.
    pub config: ProjectConfig,
    /// Design and simulation results.
    pub result: ProjectResult,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/design", get(handlers::get_design))
        .route("/simulation", get(handlers::get_simulation))
        .route("/yearly", get(handlers::get_yearly))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    eprintln!("API server listening on http://{addr}");
    axum::serve(listener, app).await
}
