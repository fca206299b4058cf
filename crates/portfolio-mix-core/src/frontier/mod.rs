pub mod analysis;
pub mod chart;
pub mod sweep;

pub use analysis::{
    analyze_pair, describe_pair, minimum_variance_point, FrontierOutput, PairAnalysisInput,
    PairDescription,
};
pub use chart::{FrontierChart, HighlightedPoint, X_AXIS_LABEL, Y_AXIS_LABEL};
pub use sweep::{generate_frontier, min_variance_point, FrontierPoint, MinVariancePoint};
