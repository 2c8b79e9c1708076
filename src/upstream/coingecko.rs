//! CoinGecko `simple/price` client.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::PriceSource;
use crate::domain::{CoinId, PriceQuote};
use crate::error::StatsError;

const SIMPLE_PRICE_ENDPOINT: &str = "/simple/price";
const USER_AGENT: &str = concat!("crypto-stats-gateway/", env!("CARGO_PKG_VERSION"));

/// Per-coin entry of a `simple/price` response. Any field may be missing.
#[derive(Debug, Deserialize)]
struct SimplePriceEntry {
    usd: Option<serde_json::Number>,
    usd_market_cap: Option<serde_json::Number>,
    usd_24h_change: Option<serde_json::Number>,
}

/// HTTP client for the CoinGecko public API.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
}

impl CoinGeckoClient {
    /// Creates a client against `base_url` (e.g. `https://api.coingecko.com/api/v3`).
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Internal`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StatsError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| StatsError::Internal(format!("failed to build http client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builds the request URL for a batch of coins.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Internal`] if the configured base URL is invalid.
    pub fn build_url(&self, coin_ids: &[CoinId]) -> Result<Url, StatsError> {
        let ids = coin_ids
            .iter()
            .map(CoinId::as_str)
            .collect::<Vec<_>>()
            .join(",");

        Url::parse_with_params(
            &format!("{}{SIMPLE_PRICE_ENDPOINT}", self.base_url),
            &[
                ("ids", ids.as_str()),
                ("vs_currencies", "usd"),
                ("include_market_cap", "true"),
                ("include_24hr_change", "true"),
            ],
        )
        .map_err(|e| StatsError::Internal(format!("invalid price api url: {e}")))
    }
}

/// Parses a `simple/price` body into quotes for the requested coins.
///
/// # Errors
///
/// Returns [`StatsError::Parse`] if the body is not valid JSON of the
/// expected shape, a numeric field is not a decimal, or none of the
/// requested coins is present.
pub fn parse_simple_price(
    body: &str,
    coin_ids: &[CoinId],
) -> Result<HashMap<CoinId, PriceQuote>, StatsError> {
    let mut entries: HashMap<String, SimplePriceEntry> = serde_json::from_str(body)
        .map_err(|e| StatsError::Parse(format!("malformed price response: {e}")))?;

    let mut quotes = HashMap::with_capacity(coin_ids.len());
    for coin in coin_ids {
        let Some(entry) = entries.remove(coin.as_str()) else {
            tracing::warn!(%coin, "coin missing from price response");
            continue;
        };
        quotes.insert(
            coin.clone(),
            PriceQuote {
                price: to_decimal(entry.usd, coin, "usd")?,
                market_cap: to_decimal(entry.usd_market_cap, coin, "usd_market_cap")?,
                change_24h: to_decimal(entry.usd_24h_change, coin, "usd_24h_change")?,
            },
        );
    }

    if quotes.is_empty() && !coin_ids.is_empty() {
        return Err(StatsError::Parse(
            "price response contains none of the requested coins".to_string(),
        ));
    }

    Ok(quotes)
}

/// Converts a JSON number through its shortest textual form so `0.1`
/// stays `0.1` instead of its binary expansion.
fn to_decimal(
    value: Option<serde_json::Number>,
    coin: &CoinId,
    field: &str,
) -> Result<Option<BigDecimal>, StatsError> {
    value
        .map(|n| {
            n.to_string().parse::<BigDecimal>().map_err(|e| {
                StatsError::Parse(format!("invalid {field} for {coin}: {e}"))
            })
        })
        .transpose()
}

#[async_trait]
impl PriceSource for CoinGeckoClient {
    async fn fetch_prices(
        &self,
        coin_ids: &[CoinId],
    ) -> Result<HashMap<CoinId, PriceQuote>, StatsError> {
        if coin_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let url = self.build_url(coin_ids)?;
        tracing::debug!(%url, "fetching prices from CoinGecko");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StatsError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StatsError::Upstream(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| StatsError::Upstream(e.to_string()))?;

        let quotes = parse_simple_price(&body, coin_ids)?;
        tracing::debug!(count = quotes.len(), "fetched prices from CoinGecko");
        Ok(quotes)
    }

    fn source_name(&self) -> &'static str {
        "coingecko"
    }
}
