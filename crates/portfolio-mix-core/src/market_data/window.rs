use chrono::{Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::PortfolioMixError;
use crate::PortfolioMixResult;

/// Default lookback in months
pub const DEFAULT_LOOKBACK_MONTHS: u32 = 6;

/// Inclusive date range `[as_of - months, as_of]` for price history requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookbackWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub months: u32,
}

impl LookbackWindow {
    pub fn ending(as_of: NaiveDate, months: u32) -> PortfolioMixResult<Self> {
        if months == 0 {
            return Err(PortfolioMixError::InvalidInput {
                field: "months".into(),
                reason: "Lookback must be at least one month".into(),
            });
        }
        let start = as_of.checked_sub_months(Months::new(months)).ok_or_else(|| {
            PortfolioMixError::DateError(format!("{as_of} minus {months} months is out of range"))
        })?;
        Ok(LookbackWindow {
            start,
            end: as_of,
            months,
        })
    }

    pub fn ending_today(months: u32) -> PortfolioMixResult<Self> {
        LookbackWindow::ending(Local::now().date_naive(), months)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Whole years covered, truncating (a 6-month window is a "0 year model").
    pub fn years(&self) -> u32 {
        self.months / 12
    }

    pub fn title(&self) -> String {
        format!("Return vs. Risk\n{} year model", self.years())
    }
}
