//! PostgreSQL implementation of the snapshot store.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::SnapshotStore;
use crate::domain::{CoinId, PriceQuote, Snapshot};
use crate::error::StatsError;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS coin_snapshots ( \
     id BIGSERIAL PRIMARY KEY, \
     coin_id VARCHAR(50) NOT NULL, \
     price NUMERIC, \
     market_cap NUMERIC, \
     change_24h NUMERIC, \
     timestamp TIMESTAMPTZ NOT NULL DEFAULT NOW() \
     )";

const CREATE_INDEX: &str = "CREATE INDEX IF NOT EXISTS idx_coin_snapshots_coin_ts \
     ON coin_snapshots (coin_id, timestamp DESC, id DESC)";

type SnapshotRow = (
    i64,
    String,
    Option<BigDecimal>,
    Option<BigDecimal>,
    Option<BigDecimal>,
    DateTime<Utc>,
);

/// PostgreSQL-backed snapshot store using `sqlx::PgPool`.
///
/// The pool is shared by the refresh job and every request handler;
/// PostgreSQL serializes concurrent access.
#[derive(Debug, Clone)]
pub struct PostgresSnapshotStore {
    pool: PgPool,
}

impl PostgresSnapshotStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SnapshotStore for PostgresSnapshotStore {
    /// Creates `coin_snapshots` and its lookup index if absent.
    ///
    /// An existing table of the same name is left untouched; its columns
    /// must match the layout above or later queries fail to decode.
    async fn ensure_schema(&self) -> Result<(), StatsError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_INDEX).execute(&self.pool).await?;
        tracing::info!("snapshot table is ready");
        Ok(())
    }

    async fn insert_snapshot(
        &self,
        coin_id: &CoinId,
        quote: &PriceQuote,
    ) -> Result<(), StatsError> {
        sqlx::query(
            "INSERT INTO coin_snapshots (coin_id, price, market_cap, change_24h) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(coin_id.as_str())
        .bind(quote.price.as_ref())
        .bind(quote.market_cap.as_ref())
        .bind(quote.change_24h.as_ref())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn latest_snapshot(&self, coin_id: &CoinId) -> Result<Option<Snapshot>, StatsError> {
        let row = sqlx::query_as::<_, SnapshotRow>(
            "SELECT id, coin_id, price, market_cap, change_24h, timestamp FROM coin_snapshots \
             WHERE coin_id = $1 ORDER BY timestamp DESC, id DESC LIMIT 1",
        )
        .bind(coin_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(
            |(id, _, price, market_cap, change_24h, timestamp)| Snapshot {
                id,
                coin_id: coin_id.clone(),
                price,
                market_cap,
                change_24h,
                timestamp,
            },
        ))
    }

    async fn recent_prices(
        &self,
        coin_id: &CoinId,
        limit: u32,
    ) -> Result<Vec<BigDecimal>, StatsError> {
        let prices = sqlx::query_scalar::<_, BigDecimal>(
            "SELECT price FROM coin_snapshots \
             WHERE coin_id = $1 AND price IS NOT NULL \
             ORDER BY timestamp DESC, id DESC LIMIT $2",
        )
        .bind(coin_id.as_str())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(prices)
    }
}
