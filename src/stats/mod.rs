//! Stats module - Quantiles and distribution summaries

mod calculator;

pub use calculator::{BoxStats, StatsCalculator, SummaryStats, WHISKER_IQR_FACTOR};
