//! In-memory snapshot store.
//!
//! Mirrors the PostgreSQL ordering rules (timestamp, then id, newest
//! first) so handlers and the refresh job can be exercised without a
//! database.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::SnapshotStore;
use crate::domain::{CoinId, PriceQuote, Snapshot};
use crate::error::StatsError;

/// Append-only snapshot list behind a `tokio::sync::RwLock`.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    rows: RwLock<Vec<Snapshot>>,
}

impl MemorySnapshotStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a snapshot with an explicit observation time.
    pub async fn insert_at(
        &self,
        coin_id: &CoinId,
        quote: &PriceQuote,
        timestamp: DateTime<Utc>,
    ) -> i64 {
        let mut rows = self.rows.write().await;
        let id = rows.last().map_or(1, |s| s.id.saturating_add(1));
        rows.push(Snapshot {
            id,
            coin_id: coin_id.clone(),
            price: quote.price.clone(),
            market_cap: quote.market_cap.clone(),
            change_24h: quote.change_24h.clone(),
            timestamp,
        });
        id
    }

    /// Total number of stored rows.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Returns `true` if no rows are stored.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    /// Number of stored rows for one coin.
    pub async fn count_for(&self, coin_id: &CoinId) -> usize {
        self.rows
            .read()
            .await
            .iter()
            .filter(|s| &s.coin_id == coin_id)
            .count()
    }

    async fn newest_first(&self, coin_id: &CoinId) -> Vec<Snapshot> {
        let mut matching: Vec<Snapshot> = self
            .rows
            .read()
            .await
            .iter()
            .filter(|s| &s.coin_id == coin_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        matching
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn ensure_schema(&self) -> Result<(), StatsError> {
        Ok(())
    }

    async fn insert_snapshot(
        &self,
        coin_id: &CoinId,
        quote: &PriceQuote,
    ) -> Result<(), StatsError> {
        self.insert_at(coin_id, quote, Utc::now()).await;
        Ok(())
    }

    async fn latest_snapshot(&self, coin_id: &CoinId) -> Result<Option<Snapshot>, StatsError> {
        Ok(self.newest_first(coin_id).await.into_iter().next())
    }

    async fn recent_prices(
        &self,
        coin_id: &CoinId,
        limit: u32,
    ) -> Result<Vec<BigDecimal>, StatsError> {
        Ok(self
            .newest_first(coin_id)
            .await
            .into_iter()
            .filter_map(|s| s.price)
            .take(limit as usize)
            .collect())
    }
}
