//! Stats service: read path behind the HTTP API.

use std::sync::Arc;

use crate::domain::deviation::{
    DEVIATION_WINDOW, MIN_DEVIATION_SAMPLES, population_std_dev, prices_to_f64,
};
use crate::domain::{CoinId, Snapshot};
use crate::error::StatsError;
use crate::persistence::SnapshotStore;

/// Read-only queries over stored snapshots.
///
/// Holds no state of its own; every call re-queries the store.
#[derive(Debug, Clone)]
pub struct StatsService {
    store: Arc<dyn SnapshotStore>,
}

impl StatsService {
    /// Creates a new `StatsService`.
    #[must_use]
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self { store }
    }

    /// Returns the most recent snapshot for `coin`.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::CoinNotFound`] if the coin has no rows, or
    /// [`StatsError::Persistence`] on storage failure.
    pub async fn latest_stats(&self, coin: &CoinId) -> Result<Snapshot, StatsError> {
        self.store
            .latest_snapshot(coin)
            .await?
            .ok_or_else(|| StatsError::CoinNotFound(coin.to_string()))
    }

    /// Population standard deviation of the last [`DEVIATION_WINDOW`]
    /// prices for `coin`.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InsufficientData`] if fewer than two prices
    /// are stored, or [`StatsError::Persistence`] on storage failure.
    pub async fn price_deviation(&self, coin: &CoinId) -> Result<f64, StatsError> {
        let prices = self.store.recent_prices(coin, DEVIATION_WINDOW).await?;
        let values = prices_to_f64(&prices)?;

        population_std_dev(&values).ok_or_else(|| StatsError::InsufficientData {
            coin: coin.to_string(),
            found: values.len(),
            required: MIN_DEVIATION_SAMPLES,
        })
    }
}
