use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortfolioMixError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {series} has {actual} observations, at least {required} required")]
    InsufficientData {
        series: String,
        required: usize,
        actual: usize,
    },

    #[error("Degenerate input in {context}: {reason}")]
    DegenerateInput { context: String, reason: String },

    #[error("Misaligned series: lengths {len_a} and {len_b} cannot be paired positionally")]
    MisalignedSeries { len_a: usize, len_b: usize },

    #[error("Negative portfolio variance {variance} at weight_a = {weight_a}")]
    NegativeVariance { weight_a: Decimal, variance: Decimal },

    #[error("Data source error: {0}")]
    DataSource(String),

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl PortfolioMixError {
    pub(crate) fn degenerate(context: &str, reason: &str) -> Self {
        PortfolioMixError::DegenerateInput {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the shape or content of the price data
    /// rather than by the arithmetic performed on it.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            PortfolioMixError::InsufficientData { .. }
                | PortfolioMixError::MisalignedSeries { .. }
                | PortfolioMixError::InvalidInput { .. }
                | PortfolioMixError::DataSource(_)
        )
    }
}

impl From<serde_json::Error> for PortfolioMixError {
    fn from(e: serde_json::Error) -> Self {
        PortfolioMixError::SerializationError(e.to_string())
    }
}
