use std::collections::HashMap;

use super::window::LookbackWindow;
use crate::error::PortfolioMixError;
use crate::types::{PriceBar, PriceSeries};
use crate::PortfolioMixResult;

/// Anything that can supply daily close history for a ticker.
///
/// Implementations return bars oldest first. Retry and backoff, if any, are
/// the implementation's concern.
pub trait PriceSource {
    fn close_prices(&self, ticker: &str, window: &LookbackWindow)
        -> PortfolioMixResult<PriceSeries>;
}

/// Keep dated bars inside the window, sorted oldest first.
///
/// Undated bars carry no position in time and are returned in their
/// original order.
pub fn within_window(bars: Vec<PriceBar>, window: &LookbackWindow) -> Vec<PriceBar> {
    if bars.iter().any(|b| b.date.is_none()) {
        return bars;
    }
    let mut kept: Vec<PriceBar> = bars
        .into_iter()
        .filter(|b| b.date.is_some_and(|d| window.contains(d)))
        .collect();
    kept.sort_by_key(|b| b.date);
    kept
}

/// In-memory source, useful for inline prices and tests
#[derive(Debug, Clone, Default)]
pub struct StaticPriceSource {
    series: HashMap<String, Vec<PriceBar>>,
}

impl StaticPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, series: PriceSeries) {
        self.series.insert(series.ticker.to_uppercase(), series.bars);
    }

    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.insert(series);
        self
    }
}

impl PriceSource for StaticPriceSource {
    fn close_prices(
        &self,
        ticker: &str,
        window: &LookbackWindow,
    ) -> PortfolioMixResult<PriceSeries> {
        let bars = self
            .series
            .get(&ticker.to_uppercase())
            .cloned()
            .ok_or_else(|| PortfolioMixError::DataSource(format!("No prices for '{ticker}'")))?;
        Ok(PriceSeries::new(ticker, within_window(bars, window)))
    }
}

/// Fetch both legs of the pair, one blocking call per ticker.
pub fn fetch_pair<S: PriceSource + ?Sized>(
    source: &S,
    ticker_a: &str,
    ticker_b: &str,
    window: &LookbackWindow,
) -> PortfolioMixResult<(PriceSeries, PriceSeries)> {
    let a = source.close_prices(ticker_a, window)?;
    let b = source.close_prices(ticker_b, window)?;
    tracing::debug!(
        ticker_a,
        ticker_b,
        len_a = a.len(),
        len_b = b.len(),
        start = %window.start,
        end = %window.end,
        "fetched price history"
    );
    Ok((a, b))
}
