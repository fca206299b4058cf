use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::sweep::{generate_frontier, min_variance_point, FrontierPoint, MinVariancePoint};
use crate::error::PortfolioMixError;
use crate::market_data::{align, AlignmentPolicy, LIFETIME_WARNING};
use crate::portfolio::{AssetStats, PairStats, TwoAssetModel};
use crate::statistics::MIN_OBSERVATIONS;
use crate::types::{with_metadata, ComputationOutput, PriceSeries};
use crate::PortfolioMixResult;

/// Two price histories and how to pair them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairAnalysisInput {
    pub asset_a: PriceSeries,
    pub asset_b: PriceSeries,
    #[serde(default)]
    pub alignment: AlignmentPolicy,
}

/// Statistics for both assets and the pair, without the sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairDescription {
    pub ticker_a: String,
    pub ticker_b: String,
    /// Paired observations used for every statistic
    pub observations: usize,
    pub asset_a: AssetStats,
    pub asset_b: AssetStats,
    pub pair: PairStats,
}

/// Full two-asset analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontierOutput {
    pub ticker_a: String,
    pub ticker_b: String,
    pub observations: usize,
    pub asset_a: AssetStats,
    pub asset_b: AssetStats,
    pub pair: PairStats,
    pub min_variance: MinVariancePoint,
    /// `"<tickerA> <pctA>%, <tickerB> <pctB>%"`
    pub min_variance_label: String,
    /// 101 points ordered by weight on asset A, 0% to 100%
    pub frontier: Vec<FrontierPoint>,
}

fn require_history(series: &PriceSeries) -> PortfolioMixResult<()> {
    if series.len() < MIN_OBSERVATIONS {
        return Err(PortfolioMixError::InsufficientData {
            series: series.ticker.clone(),
            required: MIN_OBSERVATIONS,
            actual: series.len(),
        });
    }
    Ok(())
}

/// Validate, align and reduce both series to a model.
fn prepare(
    input: &PairAnalysisInput,
    warnings: &mut Vec<String>,
) -> PortfolioMixResult<(TwoAssetModel, usize)> {
    require_history(&input.asset_a)?;
    require_history(&input.asset_b)?;

    let aligned = align(&input.asset_a, &input.asset_b, input.alignment)?;
    if aligned.is_trimmed() {
        warnings.push(LIFETIME_WARNING.to_string());
        warnings.push(format!(
            "{} paired observations used ({}: {}, {}: {}); per-asset statistics are \
             computed on the paired observations only, so closes outside the \
             overlap are excluded from expected return and deviation",
            aligned.len(),
            input.asset_a.ticker,
            input.asset_a.len(),
            input.asset_b.ticker,
            input.asset_b.len(),
        ));
    }
    if aligned.len() < MIN_OBSERVATIONS {
        return Err(PortfolioMixError::InsufficientData {
            series: format!("{}/{} aligned", input.asset_a.ticker, input.asset_b.ticker),
            required: MIN_OBSERVATIONS,
            actual: aligned.len(),
        });
    }

    let model = TwoAssetModel::from_prices(&aligned.prices_a, &aligned.prices_b)?;
    debug!(
        correlation = %model.pair.correlation,
        covariance = %model.pair.covariance,
        dev_a = %model.asset_a.percent_deviation,
        dev_b = %model.asset_b.percent_deviation,
        "pair statistics"
    );
    Ok((model, aligned.len()))
}

fn assumptions(input: &PairAnalysisInput) -> serde_json::Value {
    serde_json::json!({
        "ticker_a": input.asset_a.ticker,
        "ticker_b": input.asset_b.ticker,
        "observations_a": input.asset_a.len(),
        "observations_b": input.asset_b.len(),
        "alignment": input.alignment,
        "risk_measure": "coefficient of variation of close prices",
        "long_only": true,
    })
}

/// Per-asset and pairwise statistics.
pub fn describe_pair(
    input: &PairAnalysisInput,
) -> PortfolioMixResult<ComputationOutput<PairDescription>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let (model, observations) = prepare(input, &mut warnings)?;
    let output = PairDescription {
        ticker_a: input.asset_a.ticker.clone(),
        ticker_b: input.asset_b.ticker.clone(),
        observations,
        asset_a: model.asset_a,
        asset_b: model.asset_b,
        pair: model.pair,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Two-Asset Statistics (Expected Return, Coefficient of Variation, Covariance, Correlation)",
        &assumptions(input),
        warnings,
        elapsed,
        output,
    ))
}

/// Minimum-variance allocation only.
pub fn minimum_variance_point(
    input: &PairAnalysisInput,
) -> PortfolioMixResult<ComputationOutput<MinVariancePoint>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let (model, _) = prepare(input, &mut warnings)?;
    let point = min_variance_point(&model)?;
    if point.solution.clamped {
        warnings.push(format!(
            "Unconstrained optimum weight {} on {} lies outside [0, 1]; clamped",
            point.solution.unconstrained_weight_a, input.asset_a.ticker
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Two-Asset Global Minimum Variance (closed form, long-only)",
        &assumptions(input),
        warnings,
        elapsed,
        point,
    ))
}

/// Compute statistics, the minimum-variance point and the 101-point frontier.
///
/// Either the whole frontier is produced or the call fails; no partial output.
pub fn analyze_pair(
    input: &PairAnalysisInput,
) -> PortfolioMixResult<ComputationOutput<FrontierOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let (model, observations) = prepare(input, &mut warnings)?;
    let frontier = generate_frontier(&model)?;
    let min_variance = min_variance_point(&model)?;
    if min_variance.solution.clamped {
        warnings.push(format!(
            "Unconstrained optimum weight {} on {} lies outside [0, 1]; clamped",
            min_variance.solution.unconstrained_weight_a, input.asset_a.ticker
        ));
    }
    debug!(
        weight_a = %min_variance.solution.allocation.weight_a,
        points = frontier.len(),
        "frontier generated"
    );

    let ticker_a = input.asset_a.ticker.clone();
    let ticker_b = input.asset_b.ticker.clone();
    let output = FrontierOutput {
        min_variance_label: min_variance.label(&ticker_a, &ticker_b),
        ticker_a,
        ticker_b,
        observations,
        asset_a: model.asset_a,
        asset_b: model.asset_b,
        pair: model.pair,
        min_variance,
        frontier,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Two-Asset Mean-Variance Frontier (1% weight sweep, closed-form minimum variance)",
        &assumptions(input),
        warnings,
        elapsed,
        output,
    ))
}
