//! Domain layer: coin identity, price observations, and statistics.

pub mod coin_id;
pub mod deviation;
pub mod snapshot;

pub use coin_id::CoinId;
pub use snapshot::{PriceQuote, Snapshot};
