use rust_decimal::Decimal;

use super::descriptive::{mean, sample_std_dev};
use super::{checked_sum, cross_deviation, overflow, require_observations, MIN_OBSERVATIONS};
use crate::error::PortfolioMixError;
use crate::types::Price;
use crate::PortfolioMixResult;

fn require_aligned(a: &[Price], b: &[Price]) -> PortfolioMixResult<()> {
    if a.len() != b.len() {
        return Err(PortfolioMixError::MisalignedSeries {
            len_a: a.len(),
            len_b: b.len(),
        });
    }
    Ok(())
}

/// Sample covariance (n-1), each series centred on its own mean.
///
/// Element `i` of `a` is paired with element `i` of `b`; series of different
/// lengths are rejected and must be aligned by the caller first.
pub fn covariance(a: &[Price], b: &[Price]) -> PortfolioMixResult<Decimal> {
    require_aligned(a, b)?;
    require_observations(a, MIN_OBSERVATIONS, "covariance")?;
    let mean_a = mean(a)?;
    let mean_b = mean(b)?;
    let sum = checked_sum(
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| cross_deviation(*x, mean_a, *y, mean_b)),
        "covariance",
    )?;
    Ok(sum / Decimal::from((a.len() - 1) as i64))
}

/// Pearson correlation: covariance over the product of sample standard deviations.
///
/// Clamped to [-1, 1] to absorb rounding in the square roots.
pub fn correlation(a: &[Price], b: &[Price]) -> PortfolioMixResult<Decimal> {
    let cov = covariance(a, b)?;
    let sd_a = sample_std_dev(a)?;
    let sd_b = sample_std_dev(b)?;
    if sd_a.is_zero() || sd_b.is_zero() {
        return Err(PortfolioMixError::degenerate(
            "correlation",
            "standard deviation is zero (constant price series)",
        ));
    }
    let scale = sd_a.checked_mul(sd_b).ok_or_else(|| overflow("correlation"))?;
    Ok((cov / scale).clamp(-Decimal::ONE, Decimal::ONE))
}
