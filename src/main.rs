//! crypto-stats-gateway server entry point.
//!
//! Connects to PostgreSQL, runs one refresh cycle, starts the refresh
//! scheduler, and serves the REST API until Ctrl-C or SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crypto_stats_gateway::api;
use crypto_stats_gateway::app_state::AppState;
use crypto_stats_gateway::config::GatewayConfig;
use crypto_stats_gateway::persistence::{PostgresSnapshotStore, SnapshotStore};
use crypto_stats_gateway::service::{RefreshJob, RefreshScheduler, StatsService};
use crypto_stats_gateway::upstream::CoinGeckoClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = GatewayConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    tracing::info!(addr = %config.listen_addr, "starting crypto-stats-gateway");

    // Build persistence layer
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect_with(config.connect_options()?)
        .await
        .context("failed to connect to PostgreSQL")?;
    tracing::info!("connected to PostgreSQL");

    let store: Arc<dyn SnapshotStore> = Arc::new(PostgresSnapshotStore::new(pool));
    store
        .ensure_schema()
        .await
        .context("failed to create snapshot table")?;

    // Build refresh path
    let source = Arc::new(CoinGeckoClient::new(
        &config.coingecko_api_url,
        config.upstream_timeout(),
    )?);
    let job = Arc::new(RefreshJob::new(
        source,
        Arc::clone(&store),
        config.coin_ids.clone(),
    ));

    if config.refresh_on_startup {
        job.run_logged().await;
    }
    let scheduler = RefreshScheduler::new(Arc::clone(&job), config.refresh_interval_hours).spawn();

    // Build application state
    let app_state = AppState {
        stats_service: Arc::new(StatsService::new(store)),
        coins: Arc::from(config.coin_ids.clone()),
        refresh_interval_hours: config.refresh_interval_hours,
    };

    // Build router
    let app = api::build_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown().await;
    tracing::info!("shutdown complete");

    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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
    tracing::info!("shutdown signal received");
}
