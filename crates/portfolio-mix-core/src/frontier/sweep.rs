use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PortfolioMixError;
use crate::portfolio::{Allocation, MinimumVariance, TwoAssetModel};
use crate::types::Rate;
use crate::PortfolioMixResult;

/// Largest integer weight in the sweep; the frontier has `SWEEP_MAX + 1` points.
pub const SWEEP_MAX: u32 = 100;

/// One (risk, return) pair on the frontier, as fractions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontierPoint {
    /// Integer percentage held in asset A (0 = all B, 100 = all A)
    pub weight_pct: u32,
    pub allocation: Allocation,
    pub std_dev: Decimal,
    pub expected_return: Rate,
}

impl FrontierPoint {
    fn at(model: &TwoAssetModel, weight_pct: u32, allocation: Allocation) -> PortfolioMixResult<Self> {
        Ok(FrontierPoint {
            weight_pct,
            allocation,
            std_dev: model.std_dev(&allocation)?,
            expected_return: model.expected_return(&allocation),
        })
    }

    /// Standard deviation in percent, the chart's x coordinate.
    pub fn risk_pct(&self) -> Decimal {
        self.std_dev * dec!(100)
    }

    /// Expected return in percent, the chart's y coordinate.
    pub fn return_pct(&self) -> Decimal {
        self.expected_return * dec!(100)
    }
}

/// Sweep the weight on asset A from 0% to 100% in 1% steps.
///
/// Always returns 101 points in weight order. Any negative variance along
/// the way aborts the whole sweep.
pub fn generate_frontier(model: &TwoAssetModel) -> PortfolioMixResult<Vec<FrontierPoint>> {
    (0..=SWEEP_MAX)
        .map(|pct| FrontierPoint::at(model, pct, Allocation::from_percent(pct)?))
        .collect()
}

/// The highlighted minimum-variance point and its rounded labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinVariancePoint {
    pub solution: MinimumVariance,
    pub std_dev: Decimal,
    pub expected_return: Rate,
    /// ceil(weight_a * 100)
    pub label_pct_a: u32,
    /// floor(weight_b * 100)
    pub label_pct_b: u32,
}

impl MinVariancePoint {
    pub fn risk_pct(&self) -> Decimal {
        self.std_dev * dec!(100)
    }

    pub fn return_pct(&self) -> Decimal {
        self.expected_return * dec!(100)
    }

    /// `"<tickerA> <pctA>%, <tickerB> <pctB>%"`
    pub fn label(&self, ticker_a: &str, ticker_b: &str) -> String {
        format!(
            "{} {}%, {} {}%",
            ticker_a, self.label_pct_a, ticker_b, self.label_pct_b
        )
    }
}

fn whole_percent(value: Decimal) -> PortfolioMixResult<u32> {
    value.to_u32().ok_or_else(|| PortfolioMixError::InvalidInput {
        field: "allocation".into(),
        reason: format!("{value} is not a whole percentage"),
    })
}

/// Evaluate the minimum-variance allocation on the frontier.
///
/// Labels round A up and B down, so they need not sum to 100.
pub fn min_variance_point(model: &TwoAssetModel) -> PortfolioMixResult<MinVariancePoint> {
    let solution = model.minimum_variance()?;
    let allocation = solution.allocation;
    let pct_a = allocation.weight_a * dec!(100);
    let pct_b = allocation.weight_b * dec!(100);

    Ok(MinVariancePoint {
        std_dev: model.std_dev(&allocation)?,
        expected_return: model.expected_return(&allocation),
        label_pct_a: whole_percent(pct_a.ceil())?,
        label_pct_b: whole_percent(pct_b.floor())?,
        solution,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Price;

    fn close_enough(a: Decimal, b: Decimal) -> bool {
        (a - b).abs() < dec!(0.000000001)
    }

    fn model() -> TwoAssetModel {
        let a: Vec<Price> = vec![dec!(100), dec!(102), dec!(101), dec!(105), dec!(110)];
        let b: Vec<Price> = vec![dec!(50), dec!(49), dec!(51), dec!(50), dec!(52)];
        TwoAssetModel::from_prices(&a, &b).unwrap()
    }

    #[test]
    fn test_frontier_has_101_points_in_order() {
        let frontier = generate_frontier(&model()).unwrap();
        assert_eq!(frontier.len(), 101);
        for (i, p) in frontier.iter().enumerate() {
            assert_eq!(p.weight_pct as usize, i);
        }
    }

    #[test]
    fn test_frontier_endpoints() {
        let m = model();
        let frontier = generate_frontier(&m).unwrap();
        let first = &frontier[0];
        let last = &frontier[100];
        assert_eq!(first.allocation, Allocation::all_b());
        assert_eq!(last.allocation, Allocation::all_a());
        assert!(close_enough(first.std_dev, m.asset_b.percent_deviation));
        assert!(close_enough(last.std_dev, m.asset_a.percent_deviation));
        assert_eq!(first.return_pct(), dec!(4));
        assert_eq!(last.return_pct(), dec!(10));
    }

    #[test]
    fn test_frontier_matches_percent_scale() {
        let frontier = generate_frontier(&model()).unwrap();
        assert!(close_enough(frontier[0].risk_pct(), dec!(2.262252827577655)));
        assert!(close_enough(frontier[50].risk_pct(), dec!(2.8108813728677093)));
        assert!(close_enough(frontier[100].risk_pct(), dec!(3.897032671464546)));
        assert_eq!(frontier[50].return_pct(), dec!(7));
    }

    #[test]
    fn test_negative_variance_aborts_sweep() {
        let mut m = model();
        m.pair.correlation = dec!(-3);
        let err = generate_frontier(&m).unwrap_err();
        assert!(matches!(err, PortfolioMixError::NegativeVariance { .. }));
    }

    #[test]
    fn test_min_variance_point_clamped_to_b() {
        let mv = min_variance_point(&model()).unwrap();
        assert!(mv.solution.clamped);
        assert_eq!(mv.label_pct_a, 0);
        assert_eq!(mv.label_pct_b, 100);
        assert_eq!(mv.return_pct(), dec!(4));
        assert_eq!(mv.label("A", "B"), "A 0%, B 100%");
    }

    #[test]
    fn test_label_rounding_rule() {
        // wA = 0.2, wB = 0.8 exactly: ceil and floor agree with the value
        let mut m = model();
        m.pair.correlation = Decimal::ZERO;
        m.asset_a.percent_deviation = dec!(0.2);
        m.asset_a.variance = dec!(0.04);
        m.asset_b.percent_deviation = dec!(0.1);
        m.asset_b.variance = dec!(0.01);
        let mv = min_variance_point(&m).unwrap();
        assert_eq!((mv.label_pct_a, mv.label_pct_b), (20, 80));

        // wA = 1/3: A rounds up to 34, B rounds down to 66
        m.asset_a.percent_deviation = dec!(0.1);
        m.asset_a.variance = dec!(0.01);
        m.asset_b.percent_deviation = dec!(0.1);
        m.asset_b.variance = dec!(0.005);
        let mv = min_variance_point(&m).unwrap();
        assert_eq!((mv.label_pct_a, mv.label_pct_b), (34, 66));
    }
}
