//! # crypto-stats-gateway
//!
//! Polls the CoinGecko price API for a configured set of coins, appends
//! one snapshot per coin to PostgreSQL on a fixed wall-clock cadence, and
//! serves the latest stats and a price standard deviation over REST.
//!
//! ## Architecture
//!
//! ```text
//! RefreshScheduler ──► RefreshJob ──► PriceSource (CoinGecko)
//!                          │
//!                          ▼
//!                    SnapshotStore (PostgreSQL)
//!                          ▲
//!                          │
//! Clients (HTTP) ──► REST Handlers (api/) ──► StatsService
//! ```
//!
//! The write path and the read path share only the [`persistence::SnapshotStore`].

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod upstream;
