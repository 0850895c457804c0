//! Charts module - Plotly figure payloads and static SVG rendering

mod plotter;
mod renderer;

use thiserror::Error;

pub use plotter::{
    pick_color, quantile_opacity, ChartPlotter, Figure, HistogramStyle, LayoutStyle,
    ScatterStyle, BLUE, GREEN, LIGHT_GRAY, PALETTE, PURPLE, RED, TURQUOISE, YELLOW,
};
pub use renderer::{probability_bins, StaticChartRenderer};

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Failed to serialize figure: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to render chart: {0}")]
    Render(String),
}
