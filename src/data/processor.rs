//! Data Processor Module
//! Outlier removal and the per-group aggregations the charts are built from.

use super::model::{Dataset, MONTH_COLUMN, VALUE_COLUMN, YEAR_COLUMN};
use crate::stats::StatsCalculator;
use polars::prelude::*;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Quantile cutoffs must satisfy 0 <= lower <= upper <= 1 (got {lower}, {upper})")]
    InvalidQuantiles { lower: f64, upper: f64 },
}

/// Closed value interval computed from the unfiltered series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantileBounds {
    pub lower: f64,
    pub upper: f64,
}

impl QuantileBounds {
    /// Inclusive on both ends. NaN bounds contain nothing.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Handles data cleaning and grouping operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Quantile cutoffs over the whole dataset, linear interpolation between order statistics.
    pub fn compute_bounds(
        dataset: &Dataset,
        lower_quantile: f64,
        upper_quantile: f64,
    ) -> Result<QuantileBounds, ProcessorError> {
        let valid = |q: f64| (0.0..=1.0).contains(&q);
        if !valid(lower_quantile) || !valid(upper_quantile) || lower_quantile > upper_quantile {
            return Err(ProcessorError::InvalidQuantiles {
                lower: lower_quantile,
                upper: upper_quantile,
            });
        }

        let sorted = StatsCalculator::sorted(&dataset.values());
        Ok(QuantileBounds {
            lower: StatsCalculator::percentile(&sorted, lower_quantile * 100.0),
            upper: StatsCalculator::percentile(&sorted, upper_quantile * 100.0),
        })
    }

    /// Keep the records whose value lies inside `bounds`, preserving date order.
    pub fn apply_bounds(dataset: &Dataset, bounds: QuantileBounds) -> Dataset {
        dataset.retain_by(|r| bounds.contains(r.value))
    }

    /// Drop the tails of the distribution in a single pass.
    ///
    /// Bounds come from the unfiltered data and are returned alongside the result.
    pub fn remove_outliers(
        dataset: &Dataset,
        lower_quantile: f64,
        upper_quantile: f64,
    ) -> Result<(Dataset, QuantileBounds), ProcessorError> {
        let bounds = Self::compute_bounds(dataset, lower_quantile, upper_quantile)?;
        Ok((Self::apply_bounds(dataset, bounds), bounds))
    }

    /// Arithmetic mean of `value` for every (year, month) present in the frame.
    ///
    /// Expects the columns produced by [`Dataset::to_frame_with_date_parts`].
    pub fn monthly_means(df: &DataFrame) -> Result<BTreeMap<(i32, u32), f64>, ProcessorError> {
        let grouped = df
            .clone()
            .lazy()
            .group_by([col(YEAR_COLUMN), col(MONTH_COLUMN)])
            .agg([col(VALUE_COLUMN).mean().alias("mean")])
            .collect()?;

        let years = grouped.column(YEAR_COLUMN)?.i32()?;
        let months = grouped.column(MONTH_COLUMN)?.u32()?;
        let means = grouped.column("mean")?.f64()?;

        Ok(years
            .into_iter()
            .zip(months.into_iter())
            .zip(means.into_iter())
            .filter_map(|((year, month), mean)| Some(((year?, month?), mean?)))
            .collect())
    }

    /// Values of every row where `column` equals `key`, in frame order.
    pub fn values_where<L: Literal>(
        df: &DataFrame,
        column: &str,
        key: L,
    ) -> Result<Vec<f64>, ProcessorError> {
        let filtered = df
            .clone()
            .lazy()
            .filter(col(column).eq(lit(key)))
            .select([col(VALUE_COLUMN)])
            .collect()?;

        Ok(filtered
            .column(VALUE_COLUMN)?
            .f64()?
            .into_iter()
            .flatten()
            .collect())
    }

    /// Distinct years in the frame, ascending.
    pub fn get_years(df: &DataFrame) -> Result<Vec<i32>, ProcessorError> {
        let mut years: Vec<i32> = df
            .column(YEAR_COLUMN)?
            .unique()?
            .i32()?
            .into_iter()
            .flatten()
            .collect();
        years.sort_unstable();
        Ok(years)
    }
}
