//! Stats endpoint handlers: latest snapshot and price deviation.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{CoinQuery, DeviationResponse, StatsResponse};
use crate::app_state::AppState;
use crate::domain::deviation::format_deviation;
use crate::error::{ErrorResponse, StatsError};

/// `GET /api/stats?coin=` — Latest stats for a coin.
///
/// # Errors
///
/// Returns [`StatsError`] on a missing coin, unknown coin, or storage failure.
#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "Stats",
    summary = "Latest stats for a coin",
    description = "Returns the most recent stored price, market cap, and 24h change for the coin.",
    params(CoinQuery),
    responses(
        (status = 200, description = "Latest snapshot", body = StatsResponse),
        (status = 400, description = "Missing coin parameter", body = ErrorResponse),
        (status = 404, description = "No data for the coin", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn get_stats(
    State(state): State<AppState>,
    Query(query): Query<CoinQuery>,
) -> Result<impl IntoResponse, StatsError> {
    let coin = query.coin_id()?;
    let snapshot = state.stats_service.latest_stats(&coin).await?;
    Ok(Json(StatsResponse::from(snapshot)))
}

/// `GET /api/deviation?coin=` — Standard deviation of recent prices.
///
/// # Errors
///
/// Returns [`StatsError`] on a missing coin, fewer than two stored prices,
/// or storage failure.
#[utoipa::path(
    get,
    path = "/api/deviation",
    tag = "Stats",
    summary = "Price standard deviation",
    description = "Population standard deviation of the coin's last 100 stored prices, rounded to two decimals.",
    params(CoinQuery),
    responses(
        (status = 200, description = "Deviation computed", body = DeviationResponse),
        (status = 400, description = "Missing coin or not enough records", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn get_deviation(
    State(state): State<AppState>,
    Query(query): Query<CoinQuery>,
) -> Result<impl IntoResponse, StatsError> {
    let coin = query.coin_id()?;
    let deviation = state.stats_service.price_deviation(&coin).await?;
    Ok(Json(DeviationResponse {
        deviation: format_deviation(deviation),
    }))
}

/// Stats routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/deviation", get(get_deviation))
}
