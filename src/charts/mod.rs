//! Charts module - Chart data preparation and rendering

mod plotter;
mod renderer;

pub use plotter::{BarChartData, BoxChartData, ChartPlotter, LineChartData, PALETTE};
pub use renderer::{
    ChartKind, RenderError, StaticChartRenderer, LINE_TITLE, MONTH_BOX_TITLE, YEAR_BOX_TITLE,
};
