use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::metrics::{Allocation, AssetStats, TwoAssetModel};
use crate::error::PortfolioMixError;
use crate::types::{Price, Weight};
use crate::PortfolioMixResult;

/// Closed-form global minimum-variance solution for two assets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimumVariance {
    /// Long-only allocation after clamping to [0, 1]
    pub allocation: Allocation,
    /// Optimum weight on asset A before clamping
    pub unconstrained_weight_a: Weight,
    /// True when the unconstrained optimum lay outside [0, 1]
    pub clamped: bool,
}

/// Solve for the weight on asset A minimising portfolio variance.
///
/// ```text
/// wA = (varB - ρ·devA·devB) / (varA + varB - 2·ρ·devA·devB)
/// ```
///
/// No short selling or leverage: an optimum outside [0, 1] is moved to the
/// nearest bound.
pub fn solve_minimum_variance(
    a: &AssetStats,
    b: &AssetStats,
    correlation: Decimal,
) -> PortfolioMixResult<MinimumVariance> {
    let cross = correlation * a.percent_deviation * b.percent_deviation;
    let numerator = b.variance - cross;
    let denominator = a.variance + b.variance - dec!(2) * cross;

    if denominator.is_zero() {
        return Err(PortfolioMixError::degenerate(
            "minimum variance allocation",
            "assets are perfectly correlated with equal volatility",
        ));
    }

    let unconstrained_weight_a = numerator / denominator;
    let weight_a = unconstrained_weight_a.clamp(Decimal::ZERO, Decimal::ONE);

    Ok(MinimumVariance {
        allocation: Allocation::new(weight_a)?,
        unconstrained_weight_a,
        clamped: weight_a != unconstrained_weight_a,
    })
}

impl TwoAssetModel {
    pub fn minimum_variance(&self) -> PortfolioMixResult<MinimumVariance> {
        solve_minimum_variance(&self.asset_a, &self.asset_b, self.pair.correlation)
    }
}

/// Minimum-variance allocation between two aligned price series.
pub fn minimum_variance_allocation(
    prices_a: &[Price],
    prices_b: &[Price],
) -> PortfolioMixResult<Allocation> {
    let model = TwoAssetModel::from_prices(prices_a, prices_b)?;
    Ok(model.minimum_variance()?.allocation)
}
