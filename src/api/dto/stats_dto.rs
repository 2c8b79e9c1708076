//! Query and response DTOs for the stats endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{CoinId, Snapshot};
use crate::error::StatsError;

/// Query string shared by `/api/stats` and `/api/deviation`.
///
/// `coin` is optional at the extractor level so that a missing value
/// produces the service's own validation error body.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CoinQuery {
    /// Coin identifier, e.g. `bitcoin`.
    pub coin: Option<String>,
}

impl CoinQuery {
    /// Returns the requested coin as a lookup key.
    ///
    /// Any non-empty value is accepted; unknown ids surface as not found
    /// further down.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InvalidRequest`] if `coin` is absent or empty.
    pub fn coin_id(&self) -> Result<CoinId, StatsError> {
        self.coin
            .as_deref()
            .and_then(CoinId::lookup)
            .ok_or_else(|| StatsError::InvalidRequest("coin parameter is required".to_string()))
    }
}

/// Response body for `GET /api/stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatsResponse {
    /// Latest USD price.
    pub price: Option<String>,
    /// Latest USD market capitalisation.
    #[serde(rename = "marketCap")]
    pub market_cap: Option<String>,
    /// Latest 24h percentage change.
    #[serde(rename = "24hChange")]
    pub change_24h: Option<String>,
}

impl From<Snapshot> for StatsResponse {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            price: snapshot.price.map(|v| v.to_string()),
            market_cap: snapshot.market_cap.map(|v| v.to_string()),
            change_24h: snapshot.change_24h.map(|v| v.to_string()),
        }
    }
}

/// Response body for `GET /api/deviation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeviationResponse {
    /// Population standard deviation, two decimal places.
    #[schema(example = "5.00")]
    pub deviation: String,
}
