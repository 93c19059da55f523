//! Time Series Visualizer - daily page views as line, bar and box charts
//!
//! Pipeline: load the CSV, drop the 2.5% tails of the value distribution,
//! then draw `line_plot.png`, `bar_plot.png` and `box_plot.png`.

pub mod charts;
pub mod config;
pub mod data;
pub mod stats;
