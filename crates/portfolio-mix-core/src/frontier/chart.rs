use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::analysis::FrontierOutput;

pub const X_AXIS_LABEL: &str = "Standard Deviation (%)";
pub const Y_AXIS_LABEL: &str = "Expected Return (%)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightedPoint {
    pub x: Decimal,
    pub y: Decimal,
    pub label: String,
}

/// Everything a renderer needs to draw the risk/return curve.
///
/// `xs` and `ys` are parallel and in sweep order; both are in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontierChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub xs: Vec<Decimal>,
    pub ys: Vec<Decimal>,
    pub highlight: HighlightedPoint,
}

impl FrontierChart {
    pub fn from_output(output: &FrontierOutput, title: impl Into<String>) -> Self {
        let (xs, ys) = output
            .frontier
            .iter()
            .map(|p| (p.risk_pct(), p.return_pct()))
            .unzip();

        FrontierChart {
            title: title.into(),
            x_label: X_AXIS_LABEL.to_string(),
            y_label: Y_AXIS_LABEL.to_string(),
            xs,
            ys,
            highlight: HighlightedPoint {
                x: output.min_variance.risk_pct(),
                y: output.min_variance.return_pct(),
                label: output.min_variance_label.clone(),
            },
        }
    }
}
