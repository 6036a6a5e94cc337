//! REST API for serving a completed evaluation.
//!
//! Provides three GET endpoints:
//! - `/report` — the full evaluation report
//! - `/flows` — twelve monthly flow records
//! - `/amortization` — amortization rows with optional year-range filtering

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::calculator::EvaluationReport;

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the calculation completes and wrapped in `Arc` —
/// no locks needed since all data is read-only.
pub struct AppState {
    /// The completed evaluation.
    pub report: EvaluationReport,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/report", get(handlers::get_report))
        .route("/flows", get(handlers::get_flows))
        .route("/amortization", get(handlers::get_amortization))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Panics
///
/// Panics if the TCP listener cannot bind to `addr`.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    eprintln!("API server listening on http://{addr}");
    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| panic!("server error: {e}"));
}
