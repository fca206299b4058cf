//! Boundary between the statistics engine and wherever prices come from.

pub mod alignment;
pub mod source;
pub mod window;

pub use alignment::{align, AlignedPair, AlignmentPolicy, LIFETIME_WARNING};
pub use source::{fetch_pair, within_window, PriceSource, StaticPriceSource};
pub use window::LookbackWindow;
