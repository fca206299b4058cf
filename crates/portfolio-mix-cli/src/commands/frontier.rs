use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use portfolio_mix_core::frontier::{
    analyze_pair, describe_pair, minimum_variance_point, FrontierChart, FrontierOutput,
    PairAnalysisInput,
};
use portfolio_mix_core::market_data::window::DEFAULT_LOOKBACK_MONTHS;
use portfolio_mix_core::market_data::{fetch_pair, AlignmentPolicy, LookbackWindow, PriceSource};
use portfolio_mix_core::{with_metadata, ComputationOutput};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

use crate::input;

/// How to pair the two price histories
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AlignArg {
    /// Pair by position, truncating to the shorter history
    Positional,
    /// Pair by trading date (requires dated prices)
    ByDate,
}

impl From<AlignArg> for AlignmentPolicy {
    fn from(arg: AlignArg) -> Self {
        match arg {
            AlignArg::Positional => AlignmentPolicy::Positional,
            AlignArg::ByDate => AlignmentPolicy::ByDate,
        }
    }
}

/// Arguments shared by every two-asset command
#[derive(Args)]
pub struct PairArgs {
    /// Two ticker symbols, asset A then asset B (e.g. --tickers VTSAX VBTLX)
    #[arg(long, num_args = 2, value_names = ["TICKER_A", "TICKER_B"], required = true)]
    pub tickers: Vec<String>,

    /// Price history lookback in months
    #[arg(long, default_value_t = DEFAULT_LOOKBACK_MONTHS)]
    pub months: u32,

    /// Last day of the lookback window, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Directory holding <TICKER>.json or <TICKER>.csv price files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// JSON file mapping each ticker to its price array
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Comma-separated close prices for asset A, oldest first
    #[arg(long, value_delimiter = ',')]
    pub prices_a: Option<Vec<Decimal>>,

    /// Comma-separated close prices for asset B, oldest first
    #[arg(long, value_delimiter = ',')]
    pub prices_b: Option<Vec<Decimal>>,

    /// Series alignment before pairwise statistics
    #[arg(long, value_enum, default_value = "positional")]
    pub align: AlignArg,
}

/// Frontier plus the chart payload for a renderer
#[derive(Debug, Serialize, Deserialize)]
struct FrontierReport {
    window: LookbackWindow,
    chart: FrontierChart,
    analysis: FrontierOutput,
}

#[derive(Debug, Serialize, Deserialize)]
struct MinVarianceReport {
    label: String,
    weight_a: Decimal,
    weight_b: Decimal,
    std_dev_pct: Decimal,
    expected_return_pct: Decimal,
    unconstrained_weight_a: Decimal,
    clamped: bool,
}

fn tickers(args: &PairArgs) -> Result<(String, String), Box<dyn std::error::Error>> {
    match args.tickers.as_slice() {
        [a, b] => Ok((a.clone(), b.clone())),
        _ => Err("Exactly two tickers are required".into()),
    }
}

fn window(args: &PairArgs) -> Result<LookbackWindow, Box<dyn std::error::Error>> {
    let window = match args.as_of {
        Some(as_of) => LookbackWindow::ending(as_of, args.months)?,
        None => LookbackWindow::ending_today(args.months)?,
    };
    Ok(window)
}

fn price_source(
    args: &PairArgs,
    ticker_a: &str,
    ticker_b: &str,
) -> Result<Box<dyn PriceSource>, Box<dyn std::error::Error>> {
    match (&args.prices_a, &args.prices_b) {
        (Some(a), Some(b)) => {
            return Ok(Box::new(input::prices::source_from_inline(
                ticker_a, a, ticker_b, b,
            )))
        }
        (Some(_), None) | (None, Some(_)) => {
            return Err("--prices-a and --prices-b must be given together".into())
        }
        (None, None) => {}
    }

    if let Some(ref dir) = args.data_dir {
        Ok(Box::new(input::prices::FilePriceSource::new(dir.clone())))
    } else if let Some(ref path) = args.input {
        let data = input::file::read_json_value(path)?;
        Ok(Box::new(input::prices::source_from_json(&data)?))
    } else if let Some(data) = input::stdin::read_stdin()? {
        Ok(Box::new(input::prices::source_from_json(&data)?))
    } else {
        Err("Provide --prices-a/--prices-b, --data-dir, --input file or pipe JSON via stdin".into())
    }
}

fn load_pair(
    args: &PairArgs,
) -> Result<(PairAnalysisInput, LookbackWindow), Box<dyn std::error::Error>> {
    let (ticker_a, ticker_b) = tickers(args)?;
    let window = window(args)?;
    let source = price_source(args, &ticker_a, &ticker_b)?;
    let (asset_a, asset_b) = fetch_pair(&*source, &ticker_a, &ticker_b, &window)?;

    let input = PairAnalysisInput {
        asset_a,
        asset_b,
        alignment: args.align.into(),
    };
    Ok((input, window))
}

fn rewrap<T: Serialize, U: Serialize>(
    output: ComputationOutput<T>,
    result: U,
) -> ComputationOutput<U> {
    with_metadata(
        &output.methodology,
        &output.assumptions,
        output.warnings,
        output.metadata.computation_time_us,
        result,
    )
}

pub fn run_frontier(args: PairArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (input, window) = load_pair(&args)?;
    let output = analyze_pair(&input)?;

    let chart = FrontierChart::from_output(&output.result, window.title());
    let analysis = output.result.clone();
    let report = FrontierReport {
        window,
        chart,
        analysis,
    };

    Ok(serde_json::to_value(rewrap(output, report))?)
}

pub fn run_stats(args: PairArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (input, _) = load_pair(&args)?;
    let output = describe_pair(&input)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_min_variance(args: PairArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (input, _) = load_pair(&args)?;
    let output = minimum_variance_point(&input)?;

    let point = &output.result;
    let report = MinVarianceReport {
        label: point.label(&input.asset_a.ticker, &input.asset_b.ticker),
        weight_a: point.solution.allocation.weight_a,
        weight_b: point.solution.allocation.weight_b,
        std_dev_pct: point.std_dev * dec!(100),
        expected_return_pct: point.expected_return * dec!(100),
        unconstrained_weight_a: point.solution.unconstrained_weight_a,
        clamped: point.solution.clamped,
    };

    Ok(serde_json::to_value(rewrap(output, report))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn args() -> PairArgs {
        PairArgs {
            tickers: vec!["VTSAX".into(), "VBTLX".into()],
            months: 6,
            as_of: NaiveDate::from_ymd_opt(2024, 6, 28),
            data_dir: None,
            input: None,
            prices_a: Some(vec![dec!(100), dec!(102), dec!(101), dec!(105), dec!(110)]),
            prices_b: Some(vec![dec!(50), dec!(49), dec!(51), dec!(50), dec!(52)]),
            align: AlignArg::Positional,
        }
    }

    #[test]
    fn test_run_frontier_inline() {
        let value = run_frontier(args()).unwrap();
        let chart = &value["result"]["chart"];
        assert_eq!(chart["xs"].as_array().unwrap().len(), 101);
        assert_eq!(chart["title"], "Return vs. Risk\n0 year model");
        assert_eq!(chart["highlight"]["label"], "VTSAX 0%, VBTLX 100%");
    }

    #[test]
    fn test_run_min_variance_inline() {
        let value = run_min_variance(args()).unwrap();
        assert_eq!(value["result"]["label"], "VTSAX 0%, VBTLX 100%");
        assert_eq!(value["result"]["clamped"], true);
    }

    #[test]
    fn test_prices_must_come_in_pairs() {
        let mut a = args();
        a.prices_b = None;
        assert!(run_stats(a).is_err());
    }
}
