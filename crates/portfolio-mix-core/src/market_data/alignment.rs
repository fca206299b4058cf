use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::PortfolioMixError;
use crate::types::{Price, PriceSeries};
use crate::PortfolioMixResult;

/// Emitted whenever the two histories cannot be paired one-to-one.
pub const LIFETIME_WARNING: &str = "WARNING! You have gone past the total lifetime of at least \
                                    one of your assets. This may affect model accuracy.";

/// How two price histories are paired before pairwise statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentPolicy {
    /// Pair by index, truncating the longer series to the shorter length
    #[default]
    Positional,
    /// Pair by trading date, keeping only dates present in both series
    ByDate,
}

/// Two equal-length close sequences ready for covariance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedPair {
    pub prices_a: Vec<Price>,
    pub prices_b: Vec<Price>,
    /// Observations of A that had no partner
    pub dropped_a: usize,
    /// Observations of B that had no partner
    pub dropped_b: usize,
}

impl AlignedPair {
    pub fn len(&self) -> usize {
        self.prices_a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices_a.is_empty()
    }

    pub fn is_trimmed(&self) -> bool {
        self.dropped_a > 0 || self.dropped_b > 0
    }
}

/// Align two series under `policy`. Logs [`LIFETIME_WARNING`] when any
/// observation is dropped.
pub fn align(
    a: &PriceSeries,
    b: &PriceSeries,
    policy: AlignmentPolicy,
) -> PortfolioMixResult<AlignedPair> {
    let aligned = match policy {
        AlignmentPolicy::Positional => align_positional(a, b),
        AlignmentPolicy::ByDate => align_by_date(a, b)?,
    };

    if aligned.is_trimmed() {
        warn!(
            ticker_a = %a.ticker,
            ticker_b = %b.ticker,
            len_a = a.len(),
            len_b = b.len(),
            paired = aligned.len(),
            ?policy,
            "{}",
            LIFETIME_WARNING
        );
    }
    Ok(aligned)
}

fn align_positional(a: &PriceSeries, b: &PriceSeries) -> AlignedPair {
    let n = a.len().min(b.len());
    AlignedPair {
        prices_a: a.bars[..n].iter().map(|bar| bar.close).collect(),
        prices_b: b.bars[..n].iter().map(|bar| bar.close).collect(),
        dropped_a: a.len() - n,
        dropped_b: b.len() - n,
    }
}

fn dated_closes(series: &PriceSeries) -> PortfolioMixResult<BTreeMap<NaiveDate, Price>> {
    series
        .bars
        .iter()
        .map(|bar| {
            bar.date
                .map(|d| (d, bar.close))
                .ok_or_else(|| PortfolioMixError::InvalidInput {
                    field: series.ticker.clone(),
                    reason: "Date alignment requires every bar to carry a date".into(),
                })
        })
        .collect()
}

fn align_by_date(a: &PriceSeries, b: &PriceSeries) -> PortfolioMixResult<AlignedPair> {
    let closes_a = dated_closes(a)?;
    let closes_b = dated_closes(b)?;

    let (prices_a, prices_b): (Vec<Price>, Vec<Price>) = closes_a
        .iter()
        .filter_map(|(date, pa)| closes_b.get(date).map(|pb| (*pa, *pb)))
        .unzip();

    Ok(AlignedPair {
        dropped_a: a.len() - prices_a.len(),
        dropped_b: b.len() - prices_b.len(),
        prices_a,
        prices_b,
    })
}
