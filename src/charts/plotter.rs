//! Chart Plotter Module
//! Turns the cleaned dataset into the per-chart series the renderer draws.
//!
//! Every builder derives its own frame from the dataset it is given, so no
//! chart sees columns another chart added.

use crate::data::{
    month_abbreviation, month_name, DataProcessor, Dataset, ProcessorError, MONTH_COLUMN,
    YEAR_COLUMN,
};
use crate::stats::{BoxStats, StatsCalculator};
use chrono::{Days, NaiveDate};
use plotters::style::RGBColor;
use std::collections::BTreeMap;

/// One color per month, shared by bars, legend and month boxes.
pub const PALETTE: [RGBColor; 12] = [
    RGBColor(31, 119, 180),  // Blue
    RGBColor(255, 127, 14),  // Orange
    RGBColor(44, 160, 44),   // Green
    RGBColor(214, 39, 40),   // Red
    RGBColor(148, 103, 189), // Purple
    RGBColor(140, 86, 75),   // Brown
    RGBColor(227, 119, 194), // Pink
    RGBColor(127, 127, 127), // Gray
    RGBColor(188, 189, 34),  // Olive
    RGBColor(23, 190, 207),  // Cyan
    RGBColor(57, 59, 121),   // Navy
    RGBColor(173, 73, 74),   // Brick
];

/// Points of the time-series line, in date order.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChartData {
    pub points: Vec<(NaiveDate, f64)>,
}

impl LineChartData {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self {
            points: dataset
                .records()
                .iter()
                .map(|r| (r.date, r.value))
                .collect(),
        }
    }

    /// Date axis span; never zero-width.
    pub fn date_span(&self) -> (NaiveDate, NaiveDate) {
        let start = self.points.first().map(|p| p.0).unwrap_or_default();
        let end = self.points.last().map(|p| p.0).unwrap_or(start);
        if end > start {
            (start, end)
        } else {
            (start, start + Days::new(1))
        }
    }

    pub fn value_range(&self) -> (f64, f64) {
        ChartPlotter::padded_range(self.points.iter().map(|p| p.1))
    }
}

/// Monthly averages, clustered by year.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChartData {
    /// Ascending; one bar cluster each.
    pub years: Vec<i32>,
    pub means: BTreeMap<(i32, u32), f64>,
}

impl BarChartData {
    pub fn from_dataset(dataset: &Dataset) -> Result<Self, ProcessorError> {
        let df = dataset.to_frame_with_date_parts()?;
        let means = DataProcessor::monthly_means(&df)?;
        let years = DataProcessor::get_years(&df)?;
        Ok(Self { years, means })
    }

    /// Bar height for a (year, month) group, `None` when the month had no records.
    pub fn mean(&self, year: i32, month: u32) -> Option<f64> {
        self.means.get(&(year, month)).copied()
    }

    /// Bars of one year cluster as (month name, height), January first.
    pub fn bars_for_year(&self, year: i32) -> Vec<(&'static str, f64)> {
        (1..=12)
            .filter_map(|month| self.mean(year, month).map(|m| (month_name(month), m)))
            .collect()
    }

    pub fn max_mean(&self) -> f64 {
        self.means.values().copied().fold(0.0, f64::max)
    }
}

/// Year-wise and month-wise distributions for the box chart.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxChartData {
    pub by_year: Vec<BoxStats>,
    /// Always twelve slots, Jan..Dec; `None` where a month has no records.
    pub by_month: Vec<(&'static str, Option<BoxStats>)>,
}

impl BoxChartData {
    pub fn from_dataset(dataset: &Dataset) -> Result<Self, ProcessorError> {
        let df = dataset.to_frame_with_date_parts()?;

        let mut by_year = Vec::new();
        for year in DataProcessor::get_years(&df)? {
            let values = DataProcessor::values_where(&df, YEAR_COLUMN, year)?;
            if let Some(stats) = StatsCalculator::compute_box_stats(&year.to_string(), &values) {
                by_year.push(stats);
            }
        }

        let mut by_month = Vec::with_capacity(12);
        for month in 1..=12u32 {
            let label = month_abbreviation(month);
            let values = DataProcessor::values_where(&df, MONTH_COLUMN, month)?;
            by_month.push((label, StatsCalculator::compute_box_stats(label, &values)));
        }

        Ok(Self { by_year, by_month })
    }

    pub fn year_labels(&self) -> Vec<String> {
        self.by_year.iter().map(|s| s.label.clone()).collect()
    }

    pub fn month_labels(&self) -> Vec<String> {
        self.by_month.iter().map(|(l, _)| l.to_string()).collect()
    }

    /// Value range covering both panels, whiskers and outliers included.
    pub fn value_range(&self) -> (f64, f64) {
        let extents = self
            .by_year
            .iter()
            .chain(self.by_month.iter().filter_map(|(_, s)| s.as_ref()))
            .flat_map(|s| {
                let (lo, hi) = s.extent();
                [lo, hi]
            });
        ChartPlotter::padded_range(extents)
    }
}

/// Shared helpers for laying out categorical and numeric axes.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Get color for the n-th category.
    pub fn get_color(index: usize) -> RGBColor {
        PALETTE[index % PALETTE.len()]
    }

    /// Label for a categorical axis placed at integer positions 0..n.
    pub fn category_label(labels: &[String], x: f64) -> String {
        let idx = x.round();
        if idx < 0.0 || (x - idx).abs() > 1e-6 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }

    /// Categorical axis range with half a slot of margin each side.
    pub fn category_range(count: usize) -> std::ops::Range<f64> {
        -0.5..(count.max(1) as f64 - 0.5)
    }

    /// Min/max of `values` with 5% headroom; (0, 1) when empty.
    pub fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
        let (min, max) = values
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if min > max {
            return (0.0, 1.0);
        }
        if min == max {
            return (min - 1.0, max + 1.0);
        }
        let pad = (max - min) * 0.05;
        (min - pad, max + pad)
    }
}
