//! Refresh job: fetch upstream quotes and append one snapshot per coin.

use std::sync::Arc;

use crate::domain::CoinId;
use crate::error::StatsError;
use crate::persistence::SnapshotStore;
use crate::upstream::PriceSource;

/// Outcome of one refresh cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Coins requested from upstream.
    pub requested: usize,
    /// Snapshots written.
    pub written: usize,
    /// Coins whose write failed.
    pub failed: usize,
    /// Coins absent from the upstream payload.
    pub missing: usize,
}

/// Orchestrates one "fetch → write each coin" cycle.
///
/// An upstream failure aborts the cycle before any write. A write failure
/// for one coin is logged and the remaining coins are still written; there
/// is no transaction spanning coins.
#[derive(Debug, Clone)]
pub struct RefreshJob {
    source: Arc<dyn PriceSource>,
    store: Arc<dyn SnapshotStore>,
    coins: Vec<CoinId>,
}

impl RefreshJob {
    /// Creates a job polling `coins` from `source` into `store`.
    #[must_use]
    pub fn new(
        source: Arc<dyn PriceSource>,
        store: Arc<dyn SnapshotStore>,
        coins: Vec<CoinId>,
    ) -> Self {
        Self {
            source,
            store,
            coins,
        }
    }

    /// Runs one refresh cycle.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Upstream`] or [`StatsError::Parse`] when the
    /// price fetch fails; nothing is written in that case.
    pub async fn run_once(&self) -> Result<RefreshReport, StatsError> {
        let quotes = self.source.fetch_prices(&self.coins).await?;

        let mut report = RefreshReport {
            requested: self.coins.len(),
            ..RefreshReport::default()
        };

        for coin in &self.coins {
            let Some(quote) = quotes.get(coin) else {
                report.missing += 1;
                continue;
            };
            match self.store.insert_snapshot(coin, quote).await {
                Ok(()) => report.written += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(%coin, error = %e, "failed to store snapshot");
                }
            }
        }

        Ok(report)
    }

    /// Runs one cycle and logs its outcome instead of returning it.
    pub async fn run_logged(&self) {
        tracing::info!(
            source = self.source.source_name(),
            coins = self.coins.len(),
            "refresh cycle started"
        );
        match self.run_once().await {
            Ok(report) => tracing::info!(
                written = report.written,
                failed = report.failed,
                missing = report.missing,
                "refresh cycle finished"
            ),
            Err(e) => tracing::error!(error = %e, "refresh cycle aborted"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use bigdecimal::BigDecimal;

    use super::*;
    use crate::domain::{PriceQuote, Snapshot};
    use crate::persistence::MemorySnapshotStore;

    #[derive(Debug)]
    struct FixedSource(Result<Vec<(&'static str, &'static str)>, &'static str>);

    #[async_trait]
    impl PriceSource for FixedSource {
        async fn fetch_prices(
            &self,
            _coin_ids: &[CoinId],
        ) -> Result<HashMap<CoinId, PriceQuote>, StatsError> {
            match &self.0 {
                Ok(entries) => Ok(entries
                    .iter()
                    .filter_map(|(id, price)| {
                        let coin = CoinId::parse(id).ok()?;
                        Some((
                            coin,
                            PriceQuote {
                                price: price.parse().ok(),
                                ..PriceQuote::default()
                            },
                        ))
                    })
                    .collect()),
                Err(msg) => Err(StatsError::Upstream((*msg).to_string())),
            }
        }

        fn source_name(&self) -> &'static str {
            "fixed"
        }
    }

    /// Store that rejects writes for one coin and delegates the rest.
    #[derive(Debug)]
    struct FlakyStore {
        inner: MemorySnapshotStore,
        reject: CoinId,
    }

    #[async_trait]
    impl SnapshotStore for FlakyStore {
        async fn ensure_schema(&self) -> Result<(), StatsError> {
            Ok(())
        }

        async fn insert_snapshot(
            &self,
            coin_id: &CoinId,
            quote: &PriceQuote,
        ) -> Result<(), StatsError> {
            if coin_id == &self.reject {
                return Err(StatsError::Persistence("constraint violation".to_string()));
            }
            self.inner.insert_snapshot(coin_id, quote).await
        }

        async fn latest_snapshot(
            &self,
            coin_id: &CoinId,
        ) -> Result<Option<Snapshot>, StatsError> {
            self.inner.latest_snapshot(coin_id).await
        }

        async fn recent_prices(
            &self,
            coin_id: &CoinId,
            limit: u32,
        ) -> Result<Vec<BigDecimal>, StatsError> {
            self.inner.recent_prices(coin_id, limit).await
        }
    }

    fn coins(ids: &[&str]) -> Vec<CoinId> {
        ids.iter().filter_map(|id| CoinId::parse(id).ok()).collect()
    }

    #[tokio::test]
    async fn upstream_failure_writes_nothing() {
        let store = Arc::new(MemorySnapshotStore::new());
        let job = RefreshJob::new(
            Arc::new(FixedSource(Err("connection reset"))),
            Arc::clone(&store) as Arc<dyn SnapshotStore>,
            coins(&["bitcoin", "ethereum"]),
        );

        let result = job.run_once().await;
        assert!(matches!(result, Err(StatsError::Upstream(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn partial_upstream_data_writes_present_coins_only() {
        let store = Arc::new(MemorySnapshotStore::new());
        let job = RefreshJob::new(
            Arc::new(FixedSource(Ok(vec![("bitcoin", "67000"), ("ethereum", "3500")]))),
            Arc::clone(&store) as Arc<dyn SnapshotStore>,
            coins(&["bitcoin", "ethereum", "matic-network"]),
        );

        let Ok(report) = job.run_once().await else {
            panic!("cycle should succeed");
        };
        assert_eq!(report.written, 2);
        assert_eq!(report.missing, 1);
        assert_eq!(store.len().await, 2);
        let [btc, eth, matic] = ["bitcoin", "ethereum", "matic-network"].map(|id| {
            let Ok(coin) = CoinId::parse(id) else {
                panic!("valid coin id");
            };
            coin
        });
        assert_eq!(store.count_for(&btc).await, 1);
        assert_eq!(store.count_for(&eth).await, 1);
        assert_eq!(store.count_for(&matic).await, 0);
    }

    #[tokio::test]
    async fn one_failed_write_does_not_stop_others() {
        let Ok(reject) = CoinId::parse("ethereum") else {
            panic!("valid coin id");
        };
        let store = Arc::new(FlakyStore {
            inner: MemorySnapshotStore::new(),
            reject,
        });
        let job = RefreshJob::new(
            Arc::new(FixedSource(Ok(vec![
                ("bitcoin", "1"),
                ("ethereum", "2"),
                ("matic-network", "3"),
            ]))),
            Arc::clone(&store) as Arc<dyn SnapshotStore>,
            coins(&["bitcoin", "ethereum", "matic-network"]),
        );

        let Ok(report) = job.run_once().await else {
            panic!("cycle should succeed");
        };
        assert_eq!(report.written, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(store.inner.len().await, 2);
    }

    #[tokio::test]
    async fn rerunning_appends_rows() {
        let store = Arc::new(MemorySnapshotStore::new());
        let job = RefreshJob::new(
            Arc::new(FixedSource(Ok(vec![("bitcoin", "1")]))),
            Arc::clone(&store) as Arc<dyn SnapshotStore>,
            coins(&["bitcoin"]),
        );

        let _ = job.run_once().await;
        let _ = job.run_once().await;
        assert_eq!(store.len().await, 2);
    }
}
