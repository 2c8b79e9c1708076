//! Population standard deviation over recent prices.

use bigdecimal::{BigDecimal, ToPrimitive};

use crate::error::StatsError;

/// Number of most recent prices the deviation is computed over.
pub const DEVIATION_WINDOW: u32 = 100;

/// Minimum number of prices needed for a meaningful deviation.
pub const MIN_DEVIATION_SAMPLES: usize = 2;

/// Population standard deviation (divisor = sample count).
///
/// Returns `None` when fewer than [`MIN_DEVIATION_SAMPLES`] values are given.
#[must_use]
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < MIN_DEVIATION_SAMPLES {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some(variance.sqrt())
}

/// Formats a deviation with exactly two decimal places.
#[must_use]
pub fn format_deviation(value: f64) -> String {
    format!("{value:.2}")
}

/// Converts stored decimal prices to `f64` for the deviation computation.
///
/// # Errors
///
/// Returns [`StatsError::Internal`] if a price cannot be represented as a
/// finite `f64`.
pub fn prices_to_f64(prices: &[BigDecimal]) -> Result<Vec<f64>, StatsError> {
    prices
        .iter()
        .map(|p| {
            p.to_f64()
                .filter(|v| v.is_finite())
                .ok_or_else(|| StatsError::Internal(format!("price {p} is not representable")))
        })
        .collect()
}
