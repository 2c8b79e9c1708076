//! REST API layer: route handlers, DTOs, OpenAPI document, and router
//! composition.
//!
//! Stats endpoints are mounted under `/api`; system endpoints at the root.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI document covering every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "crypto-stats-gateway"),
    paths(
        handlers::stats::get_stats,
        handlers::stats::get_deviation,
        handlers::system::health_handler,
        handlers::system::coins_handler,
    ),
    components(schemas(
        dto::StatsResponse,
        dto::DeviationResponse,
        crate::error::ErrorResponse,
        crate::error::ErrorBody,
        handlers::system::HealthResponse,
        handlers::system::CoinCatalog,
    )),
    tags(
        (name = "Stats", description = "Latest snapshots and price deviation"),
        (name = "System", description = "Health and configuration"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .nest("/api", handlers::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
}
