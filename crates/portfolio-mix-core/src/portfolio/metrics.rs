use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PortfolioMixError;
use crate::statistics;
use crate::types::{Price, Rate, Weight};
use crate::PortfolioMixResult;

/// Per-asset statistics derived from one price series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetStats {
    /// Fractional change first to last close
    pub expected_return: Rate,
    /// Coefficient of variation, the per-asset risk proxy
    pub percent_deviation: Rate,
    /// percent_deviation squared
    pub variance: Decimal,
    pub observations: usize,
}

impl AssetStats {
    pub fn from_prices(prices: &[Price]) -> PortfolioMixResult<Self> {
        let expected_return = statistics::expected_return(prices)?;
        let percent_deviation = statistics::percent_deviation(prices)?;
        Ok(AssetStats {
            expected_return,
            percent_deviation,
            variance: percent_deviation * percent_deviation,
            observations: prices.len(),
        })
    }
}

/// Co-movement statistics for two positionally aligned price series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairStats {
    pub covariance: Decimal,
    pub correlation: Decimal,
}

impl PairStats {
    pub fn from_prices(a: &[Price], b: &[Price]) -> PortfolioMixResult<Self> {
        Ok(PairStats {
            covariance: statistics::covariance(a, b)?,
            correlation: statistics::correlation(a, b)?,
        })
    }
}

/// A long-only split between asset A and asset B.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub weight_a: Weight,
    pub weight_b: Weight,
}

impl Allocation {
    /// Weight on asset A in [0, 1]; asset B receives the remainder.
    pub fn new(weight_a: Weight) -> PortfolioMixResult<Self> {
        if weight_a < Decimal::ZERO || weight_a > Decimal::ONE {
            return Err(PortfolioMixError::InvalidInput {
                field: "weight_a".into(),
                reason: format!("Weight must be between 0 and 1, got {weight_a}"),
            });
        }
        Ok(Allocation {
            weight_a,
            weight_b: Decimal::ONE - weight_a,
        })
    }

    /// Integer percentage of asset A, 0..=100.
    pub fn from_percent(pct_a: u32) -> PortfolioMixResult<Self> {
        Allocation::new(Decimal::from(pct_a) / dec!(100))
    }

    pub fn all_a() -> Self {
        Allocation {
            weight_a: Decimal::ONE,
            weight_b: Decimal::ZERO,
        }
    }

    pub fn all_b() -> Self {
        Allocation {
            weight_a: Decimal::ZERO,
            weight_b: Decimal::ONE,
        }
    }
}

/// Precomputed statistics for a pair of assets.
///
/// Correlation is fixed across a weight sweep, so it is computed once here
/// and reused for every allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoAssetModel {
    pub asset_a: AssetStats,
    pub asset_b: AssetStats,
    pub pair: PairStats,
}

impl TwoAssetModel {
    /// Both series must already be aligned to the same length.
    pub fn from_prices(a: &[Price], b: &[Price]) -> PortfolioMixResult<Self> {
        Ok(TwoAssetModel {
            asset_a: AssetStats::from_prices(a)?,
            asset_b: AssetStats::from_prices(b)?,
            pair: PairStats::from_prices(a, b)?,
        })
    }

    pub fn expected_return(&self, allocation: &Allocation) -> Rate {
        weighted_return(
            allocation.weight_a,
            &self.asset_a,
            allocation.weight_b,
            &self.asset_b,
        )
    }

    pub fn variance(&self, allocation: &Allocation) -> Decimal {
        weighted_variance(
            allocation.weight_a,
            &self.asset_a,
            allocation.weight_b,
            &self.asset_b,
            self.pair.correlation,
        )
    }

    /// Square root of the portfolio variance. A negative variance (only
    /// reachable with a correlation outside [-1, 1]) is an error, never zero.
    pub fn std_dev(&self, allocation: &Allocation) -> PortfolioMixResult<Decimal> {
        let variance = self.variance(allocation);
        variance
            .sqrt()
            .ok_or(PortfolioMixError::NegativeVariance {
                weight_a: allocation.weight_a,
                variance,
            })
    }
}

fn weighted_return(weight_a: Decimal, a: &AssetStats, weight_b: Decimal, b: &AssetStats) -> Rate {
    weight_a * a.expected_return + weight_b * b.expected_return
}

fn weighted_variance(
    weight_a: Decimal,
    a: &AssetStats,
    weight_b: Decimal,
    b: &AssetStats,
    correlation: Decimal,
) -> Decimal {
    weight_a * weight_a * a.variance
        + weight_b * weight_b * b.variance
        + dec!(2) * weight_a * weight_b * correlation * a.percent_deviation * b.percent_deviation
}

/// Weighted expected return of a two-asset portfolio.
///
/// Weights are used as given, with no normalisation: pass both on the same
/// scale as any matching [`portfolio_variance`] call.
pub fn portfolio_expected_return(
    weight_a: Decimal,
    prices_a: &[Price],
    weight_b: Decimal,
    prices_b: &[Price],
) -> PortfolioMixResult<Rate> {
    let a = AssetStats::from_prices(prices_a)?;
    let b = AssetStats::from_prices(prices_b)?;
    Ok(weighted_return(weight_a, &a, weight_b, &b))
}

/// Two-asset portfolio variance:
/// `wA²·varA + wB²·varB + 2·wA·wB·ρ·devA·devB`.
///
/// `correlation` is supplied by the caller so a sweep computes it once.
pub fn portfolio_variance(
    weight_a: Decimal,
    prices_a: &[Price],
    weight_b: Decimal,
    prices_b: &[Price],
    correlation: Decimal,
) -> PortfolioMixResult<Decimal> {
    let a = AssetStats::from_prices(prices_a)?;
    let b = AssetStats::from_prices(prices_b)?;
    Ok(weighted_variance(weight_a, &a, weight_b, &b, correlation))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close_enough(a: Decimal, b: Decimal) -> bool {
        (a - b).abs() < dec!(0.000000001)
    }

    fn prices_a() -> Vec<Price> {
        vec![dec!(100), dec!(102), dec!(101), dec!(105), dec!(110)]
    }

    fn prices_b() -> Vec<Price> {
        vec![dec!(50), dec!(49), dec!(51), dec!(50), dec!(52)]
    }

    fn model() -> TwoAssetModel {
        TwoAssetModel::from_prices(&prices_a(), &prices_b()).unwrap()
    }

    #[test]
    fn test_asset_stats() {
        let stats = AssetStats::from_prices(&prices_b()).unwrap();
        assert_eq!(stats.expected_return, dec!(0.04));
        assert_eq!(stats.observations, 5);
        assert_eq!(
            stats.variance,
            stats.percent_deviation * stats.percent_deviation
        );
    }

    #[test]
    fn test_variance_at_corners() {
        let m = model();
        assert_eq!(m.variance(&Allocation::all_a()), m.asset_a.variance);
        assert_eq!(m.variance(&Allocation::all_b()), m.asset_b.variance);
    }

    #[test]
    fn test_expected_return_midpoint() {
        let m = model();
        let half = Allocation::from_percent(50).unwrap();
        assert_eq!(m.expected_return(&half), dec!(0.07));
    }

    #[test]
    fn test_percent_scale_matches_fraction_scale() {
        // Weights on the 0-100 scale give results 100x (return) and 10_000x (variance).
        let corr = statistics::correlation(&prices_a(), &prices_b()).unwrap();
        let ret = portfolio_expected_return(dec!(50), &prices_a(), dec!(50), &prices_b()).unwrap();
        assert_eq!(ret, dec!(7));
        let var_pct =
            portfolio_variance(dec!(50), &prices_a(), dec!(50), &prices_b(), corr).unwrap();
        let var_frac =
            portfolio_variance(dec!(0.5), &prices_a(), dec!(0.5), &prices_b(), corr).unwrap();
        assert!(close_enough(var_pct, var_frac * dec!(10000)));
        // sqrt(var) at 50/50 on the percent scale
        assert!(close_enough(var_pct.sqrt().unwrap(), dec!(2.8108813728677093)));
    }

    #[test]
    fn test_negative_variance_surfaced() {
        let mut m = model();
        m.pair.correlation = dec!(-3);
        let half = Allocation::from_percent(50).unwrap();
        let err = m.std_dev(&half).unwrap_err();
        assert!(matches!(err, PortfolioMixError::NegativeVariance { .. }));
    }

    #[test]
    fn test_allocation_bounds() {
        assert!(Allocation::new(dec!(1.01)).is_err());
        assert!(Allocation::new(dec!(-0.01)).is_err());
        let a = Allocation::new(dec!(0.25)).unwrap();
        assert_eq!(a.weight_a + a.weight_b, Decimal::ONE);
        assert!(Allocation::from_percent(101).is_err());
    }
}
