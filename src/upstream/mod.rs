//! Upstream price API abstraction.
//!
//! [`PriceSource`] is the seam between the refresh job and the network.
//! [`coingecko::CoinGeckoClient`] is the production implementation.

pub mod coingecko;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{CoinId, PriceQuote};
use crate::error::StatsError;

pub use coingecko::CoinGeckoClient;

/// A source of current coin quotes.
#[async_trait]
pub trait PriceSource: Send + Sync + std::fmt::Debug {
    /// Fetches quotes for all `coin_ids` in a single request.
    ///
    /// Coins absent from the upstream payload are omitted from the map.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Upstream`] if the request fails, times out, or
    /// yields a non-success status, and [`StatsError::Parse`] if the body is
    /// malformed or contains none of the requested coins.
    async fn fetch_prices(
        &self,
        coin_ids: &[CoinId],
    ) -> Result<HashMap<CoinId, PriceQuote>, StatsError>;

    /// Returns the name of this source, for logging.
    fn source_name(&self) -> &'static str;
}
