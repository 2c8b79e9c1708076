//! System endpoints: health check and tracked-coin catalog.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::CoinId;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Tracked coins and refresh cadence.
#[derive(Debug, Serialize, ToSchema)]
pub struct CoinCatalog {
    #[schema(value_type = Vec<String>)]
    coins: Vec<CoinId>,
    refresh_interval_hours: u32,
}

/// `GET /config/coins` — List tracked coins.
#[utoipa::path(
    get,
    path = "/config/coins",
    tag = "System",
    summary = "List tracked coins",
    description = "Returns the coin ids polled on every refresh cycle and the refresh cadence in hours.",
    responses(
        (status = 200, description = "Coin catalog", body = CoinCatalog),
    )
)]
pub async fn coins_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(CoinCatalog {
            coins: state.coins.to_vec(),
            refresh_interval_hours: state.refresh_interval_hours,
        }),
    )
}

/// System routes mounted at the root level (not under /api).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/coins", get(coins_handler))
}
