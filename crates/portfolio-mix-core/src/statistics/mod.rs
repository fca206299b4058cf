//! Statistics primitives over close-price sequences.
//!
//! All functions operate on chronologically ordered slices (oldest first)
//! and use sample (n-1) estimators.

pub mod descriptive;
pub mod pairwise;

pub use descriptive::{
    expected_return, mean, percent_deviation, sample_std_dev, sample_variance, simple_returns,
};
pub use pairwise::{correlation, covariance};

use rust_decimal::Decimal;

use crate::error::PortfolioMixError;
use crate::types::Price;
use crate::PortfolioMixResult;

/// Minimum observations for any return or dispersion statistic.
pub const MIN_OBSERVATIONS: usize = 2;

pub(crate) fn require_observations(
    series: &[Price],
    required: usize,
    name: &str,
) -> PortfolioMixResult<()> {
    if series.len() < required {
        return Err(PortfolioMixError::InsufficientData {
            series: name.into(),
            required,
            actual: series.len(),
        });
    }
    Ok(())
}

pub(crate) fn overflow(context: &str) -> PortfolioMixError {
    PortfolioMixError::InvalidInput {
        field: context.into(),
        reason: "price magnitudes overflow 128-bit decimal arithmetic".into(),
    }
}

/// Sum that reports overflow instead of panicking.
pub(crate) fn checked_sum<I>(values: I, context: &str) -> PortfolioMixResult<Decimal>
where
    I: IntoIterator<Item = Option<Decimal>>,
{
    values.into_iter().try_fold(Decimal::ZERO, |acc, v| {
        v.and_then(|v| acc.checked_add(v))
            .ok_or_else(|| overflow(context))
    })
}

/// `(x - mean_x) * (y - mean_y)`, or None on overflow.
pub(crate) fn cross_deviation(
    x: Decimal,
    mean_x: Decimal,
    y: Decimal,
    mean_y: Decimal,
) -> Option<Decimal> {
    x.checked_sub(mean_x)?.checked_mul(y.checked_sub(mean_y)?)
}
