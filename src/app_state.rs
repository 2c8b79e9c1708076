//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::CoinId;
use crate::service::StatsService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Read-path queries over stored snapshots.
    pub stats_service: Arc<StatsService>,
    /// Coins polled by the refresh job.
    pub coins: Arc<[CoinId]>,
    /// Refresh cadence in hours.
    pub refresh_interval_hours: u32,
}
