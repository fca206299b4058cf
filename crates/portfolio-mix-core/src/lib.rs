pub mod error;
pub mod portfolio;
pub mod statistics;
pub mod types;

#[cfg(feature = "frontier")]
pub mod frontier;

#[cfg(feature = "market_data")]
pub mod market_data;

pub use error::PortfolioMixError;
pub use types::*;

/// Standard result type for all portfolio-mix operations
pub type PortfolioMixResult<T> = Result<T, PortfolioMixError>;
