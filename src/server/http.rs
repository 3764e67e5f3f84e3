//! HTTP server
//!
//! Thin axum router over the ledger; all request/response shaping lives in
//! `routes`.

use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::ledger::PointsLedger;
use crate::server::routes;
use crate::types::{Result, TalentsError};

/// Shared application state
pub struct AppState {
    pub ledger: Arc<PointsLedger>,
}

/// Build the API router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route(
            "/v1/activity",
            post(routes::play).get(routes::list_activities),
        )
        .route("/v1/activity/limit", get(routes::query_is_limit))
        .route("/v1/activity/log/:account", get(routes::query_activity_logs))
        .route("/v1/account", post(routes::register))
        .route("/v1/account/claim_points", post(routes::claim_points))
        .route("/v1/account/:id", get(routes::query_account))
        .route(
            "/v1/account/:id/save_points_addr",
            post(routes::save_points_addr),
        )
        .with_state(state)
}

/// Bind and serve until the process exits
pub async fn run(state: Arc<AppState>, listen: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| TalentsError::Internal(format!("Failed to bind {}: {}", listen, e)))?;

    info!("Listening on {}", listen);

    axum::serve(listener, router(state))
        .await
        .map_err(|e| TalentsError::Internal(format!("Server error: {}", e)))
}
