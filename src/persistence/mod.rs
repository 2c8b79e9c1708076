//! Persistence layer: append-only price snapshot storage.
//!
//! Provides the [`SnapshotStore`] trait shared by the refresh job (write
//! path) and the HTTP handlers (read path). The production implementation
//! uses `sqlx::PgPool`; [`memory::MemorySnapshotStore`] backs tests and
//! local runs without a database.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use bigdecimal::BigDecimal;

use crate::domain::{CoinId, PriceQuote, Snapshot};
use crate::error::StatsError;

pub use memory::MemorySnapshotStore;
pub use postgres::PostgresSnapshotStore;

/// Durable storage for [`Snapshot`] rows.
///
/// Rows are immutable once written: there is no update or delete.
/// Implementations do no caching; every call hits the backing store.
#[async_trait]
pub trait SnapshotStore: Send + Sync + std::fmt::Debug {
    /// Idempotently creates the snapshot table.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Persistence`] if the schema statement fails.
    async fn ensure_schema(&self) -> Result<(), StatsError>;

    /// Appends one snapshot with a storage-assigned id and timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Persistence`] on connectivity or constraint
    /// failure.
    async fn insert_snapshot(
        &self,
        coin_id: &CoinId,
        quote: &PriceQuote,
    ) -> Result<(), StatsError>;

    /// Returns the most recent snapshot for `coin_id`, or `None` if the
    /// coin has no rows.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Persistence`] on database failure.
    async fn latest_snapshot(&self, coin_id: &CoinId) -> Result<Option<Snapshot>, StatsError>;

    /// Returns up to `limit` most recent non-null prices for `coin_id`,
    /// newest first. Ties on timestamp are ordered by id, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Persistence`] on database failure.
    async fn recent_prices(
        &self,
        coin_id: &CoinId,
        limit: u32,
    ) -> Result<Vec<BigDecimal>, StatsError>;
}
