//! Price observations: the upstream quote and the stored snapshot row.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use super::CoinId;

/// One coin's figures as reported by the price API.
///
/// Every field is optional: a missing upstream value is kept as `None`
/// all the way to storage rather than being recorded as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceQuote {
    /// USD price.
    pub price: Option<BigDecimal>,
    /// USD market capitalisation.
    pub market_cap: Option<BigDecimal>,
    /// Percentage change over the last 24 hours; may be negative.
    pub change_24h: Option<BigDecimal>,
}

/// An immutable recorded observation of a coin at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Storage-assigned surrogate id, monotonically increasing.
    pub id: i64,
    /// Coin the observation belongs to.
    pub coin_id: CoinId,
    /// USD price.
    pub price: Option<BigDecimal>,
    /// USD market capitalisation.
    pub market_cap: Option<BigDecimal>,
    /// 24h percentage change.
    pub change_24h: Option<BigDecimal>,
    /// Observation time, assigned at insert.
    pub timestamp: DateTime<Utc>,
}
