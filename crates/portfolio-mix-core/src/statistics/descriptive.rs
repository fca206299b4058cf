use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use super::{checked_sum, cross_deviation, require_observations, MIN_OBSERVATIONS};
use crate::error::PortfolioMixError;
use crate::types::{Price, Rate};
use crate::PortfolioMixResult;

/// Arithmetic mean
pub fn mean(series: &[Price]) -> PortfolioMixResult<Decimal> {
    require_observations(series, 1, "mean")?;
    let sum = checked_sum(series.iter().map(|x| Some(*x)), "mean")?;
    Ok(sum / Decimal::from(series.len() as i64))
}

/// Sample variance (n-1 denominator)
pub fn sample_variance(series: &[Price]) -> PortfolioMixResult<Decimal> {
    require_observations(series, MIN_OBSERVATIONS, "sample variance")?;
    let avg = mean(series)?;
    let sum_sq = checked_sum(
        series.iter().map(|x| cross_deviation(*x, avg, *x, avg)),
        "sample variance",
    )?;
    Ok(sum_sq / Decimal::from((series.len() - 1) as i64))
}

/// Sample standard deviation (n-1 denominator)
pub fn sample_std_dev(series: &[Price]) -> PortfolioMixResult<Decimal> {
    let variance = sample_variance(series)?;
    variance.sqrt().ok_or_else(|| {
        PortfolioMixError::degenerate("sample standard deviation", "variance is negative")
    })
}

/// Fractional change from the first to the last observation.
pub fn expected_return(series: &[Price]) -> PortfolioMixResult<Rate> {
    require_observations(series, MIN_OBSERVATIONS, "expected return")?;
    let initial = series[0];
    let current = series[series.len() - 1];
    if initial.is_zero() {
        return Err(PortfolioMixError::degenerate(
            "expected return",
            "initial price is zero",
        ));
    }
    Ok((current - initial) / initial)
}

/// Coefficient of variation: sample standard deviation over the mean.
///
/// Scale-free, so multiplying every price by a positive constant leaves it
/// unchanged. Used as the per-asset risk proxy.
pub fn percent_deviation(series: &[Price]) -> PortfolioMixResult<Rate> {
    let sd = sample_std_dev(series)?;
    let avg = mean(series)?;
    if avg.is_zero() {
        return Err(PortfolioMixError::degenerate(
            "percent deviation",
            "mean price is zero",
        ));
    }
    Ok(sd / avg)
}

/// Period-over-period simple returns, one shorter than the input.
pub fn simple_returns(series: &[Price]) -> PortfolioMixResult<Vec<Rate>> {
    require_observations(series, MIN_OBSERVATIONS, "simple returns")?;
    series
        .windows(2)
        .enumerate()
        .map(|(i, w)| {
            if w[0].is_zero() {
                return Err(PortfolioMixError::DegenerateInput {
                    context: "simple returns".into(),
                    reason: format!("price at index {i} is zero"),
                });
            }
            Ok((w[1] - w[0]) / w[0])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn close_enough(a: Decimal, b: Decimal) -> bool {
        (a - b).abs() < dec!(0.000000001)
    }

    fn prices_a() -> Vec<Price> {
        vec![dec!(100), dec!(102), dec!(101), dec!(105), dec!(110)]
    }

    #[test]
    fn test_mean_and_variance() {
        let p = prices_a();
        assert_eq!(mean(&p).unwrap(), dec!(103.6));
        assert_eq!(sample_variance(&p).unwrap(), dec!(16.3));
    }

    #[test]
    fn test_std_dev_matches_variance() {
        let sd = sample_std_dev(&prices_a()).unwrap();
        assert!(close_enough(sd * sd, dec!(16.3)));
    }

    #[test]
    fn test_expected_return() {
        assert_eq!(expected_return(&prices_a()).unwrap(), dec!(0.1));
    }

    #[test]
    fn test_expected_return_zero_initial_price() {
        let err = expected_return(&[dec!(0), dec!(5)]).unwrap_err();
        assert!(matches!(err, PortfolioMixError::DegenerateInput { .. }));
    }

    #[test]
    fn test_percent_deviation() {
        let dev = percent_deviation(&prices_a()).unwrap();
        assert!(close_enough(dev, dec!(0.03897032671464546)));
    }

    #[test]
    fn test_percent_deviation_constant_series_is_zero() {
        let dev = percent_deviation(&[dec!(100), dec!(100), dec!(100)]).unwrap();
        assert_eq!(dev, Decimal::ZERO);
    }

    #[test]
    fn test_percent_deviation_zero_mean() {
        let err = percent_deviation(&[dec!(-1), dec!(1)]).unwrap_err();
        assert!(matches!(err, PortfolioMixError::DegenerateInput { .. }));
    }

    #[test]
    fn test_single_observation_rejected() {
        let err = percent_deviation(&[dec!(100)]).unwrap_err();
        assert!(matches!(
            err,
            PortfolioMixError::InsufficientData {
                required: 2,
                actual: 1,
                ..
            }
        ));
        assert!(expected_return(&[dec!(100)]).is_err());
    }

    #[test]
    fn test_mean_empty() {
        assert!(mean(&[]).is_err());
    }

    #[test]
    fn test_huge_prices_overflow_is_an_error() {
        let huge = [dec!(1000000000000000), dec!(3000000000000000)];
        let err = percent_deviation(&huge).unwrap_err();
        assert!(matches!(err, PortfolioMixError::InvalidInput { .. }));
        let err = mean(&[Decimal::MAX, Decimal::MAX]).unwrap_err();
        assert!(matches!(err, PortfolioMixError::InvalidInput { .. }));
    }

    #[test]
    fn test_simple_returns() {
        let r = simple_returns(&[dec!(100), dec!(110), dec!(99)]).unwrap();
        assert_eq!(r, vec![dec!(0.1), dec!(-0.1)]);
    }

    #[test]
    fn test_simple_returns_zero_price() {
        assert!(simple_returns(&[dec!(100), dec!(0), dec!(5)]).is_err());
    }

    #[test]
    fn test_scale_invariance() {
        let p = prices_a();
        let scaled: Vec<Price> = p.iter().map(|x| x * dec!(3.5)).collect();
        assert!(close_enough(
            expected_return(&p).unwrap(),
            expected_return(&scaled).unwrap()
        ));
        assert!(close_enough(
            percent_deviation(&p).unwrap(),
            percent_deviation(&scaled).unwrap()
        ));
    }
}
