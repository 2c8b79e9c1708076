//! PostgreSQL snapshot store integration tests.
//!
//! Skipped unless `TEST_DATABASE_URL` points at a disposable database.

#![allow(clippy::panic, missing_docs)]

use std::sync::Arc;

use chrono::Utc;
use crypto_stats_gateway::domain::{CoinId, PriceQuote};
use crypto_stats_gateway::persistence::{PostgresSnapshotStore, SnapshotStore};
use crypto_stats_gateway::service::StatsService;
use sqlx::PgPool;

async fn store() -> Option<PostgresSnapshotStore> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let Ok(pool) = PgPool::connect(&url).await else {
        panic!("TEST_DATABASE_URL is set but unreachable");
    };
    let store = PostgresSnapshotStore::new(pool);
    let Ok(()) = store.ensure_schema().await else {
        panic!("schema creation failed");
    };
    Some(store)
}

/// A coin id no other test run has written to.
fn fresh_coin(prefix: &str) -> CoinId {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let Ok(coin) = CoinId::parse(&format!("{prefix}-{nanos}")) else {
        panic!("valid coin id");
    };
    coin
}

fn price(p: &str) -> PriceQuote {
    PriceQuote {
        price: p.parse().ok(),
        ..PriceQuote::default()
    }
}

#[tokio::test]
async fn ensure_schema_is_idempotent() {
    let Some(store) = store().await else {
        return;
    };
    assert!(store.ensure_schema().await.is_ok());
}

#[tokio::test]
async fn latest_snapshot_round_trip() {
    let Some(store) = store().await else {
        return;
    };
    let coin = fresh_coin("latest");

    let Ok(None) = store.latest_snapshot(&coin).await else {
        panic!("fresh coin should have no rows");
    };

    let quote = PriceQuote {
        price: "67000.5".parse().ok(),
        market_cap: None,
        change_24h: "-1.25".parse().ok(),
    };
    assert!(store.insert_snapshot(&coin, &price("1")).await.is_ok());
    assert!(store.insert_snapshot(&coin, &quote).await.is_ok());

    let Ok(Some(latest)) = store.latest_snapshot(&coin).await else {
        panic!("expected a snapshot");
    };
    assert_eq!(latest.coin_id, coin);
    assert_eq!(latest.price, quote.price);
    assert!(latest.market_cap.is_none());
    assert_eq!(latest.change_24h, quote.change_24h);
}

#[tokio::test]
async fn deviation_over_stored_prices() {
    let Some(store) = store().await else {
        return;
    };
    let coin = fresh_coin("deviation");
    for p in ["10", "20"] {
        assert!(store.insert_snapshot(&coin, &price(p)).await.is_ok());
    }

    let service = StatsService::new(Arc::new(store));
    let Ok(dev) = service.price_deviation(&coin).await else {
        panic!("deviation should compute");
    };
    assert!((dev - 5.0).abs() < 1e-9);
}
