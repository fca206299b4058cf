pub mod metrics;
pub mod min_variance;

pub use metrics::{
    portfolio_expected_return, portfolio_variance, Allocation, AssetStats, PairStats,
    TwoAssetModel,
};
pub use min_variance::{minimum_variance_allocation, solve_minimum_variance, MinimumVariance};
