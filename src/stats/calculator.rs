//! Statistics Calculator Module
//! Quantiles, box-plot summaries and descriptive statistics for page-view series.

use statrs::statistics::Statistics;

/// Whisker reach in multiples of the interquartile range.
pub const WHISKER_IQR_FACTOR: f64 = 1.5;

/// Descriptive statistics of a whole series.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Tukey box-plot summary of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub label: String,
    pub count: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest observation not below `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    /// Largest observation not above `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Lowest and highest point drawn for this box, outliers included.
    pub fn extent(&self) -> (f64, f64) {
        self.outliers
            .iter()
            .fold((self.lower_whisker, self.upper_whisker), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Ascending copy of `values`.
    pub fn sorted(values: &[f64]) -> Vec<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        sorted
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    ///
    /// `p` is in percent; `sorted_values` must be ascending.
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Count, mean, sample standard deviation and range of `values`.
    ///
    /// Empty input yields NaN statistics.
    pub fn compute_summary(values: &[f64]) -> SummaryStats {
        SummaryStats {
            count: values.len(),
            mean: values.mean(),
            std: values.std_dev(),
            min: values.min(),
            max: values.max(),
        }
    }

    /// Box-plot summary; `None` when the category has no values.
    pub fn compute_box_stats(label: &str, values: &[f64]) -> Option<BoxStats> {
        if values.is_empty() {
            return None;
        }

        let sorted = Self::sorted(values);
        let q1 = Self::percentile(&sorted, 25.0);
        let median = Self::percentile(&sorted, 50.0);
        let q3 = Self::percentile(&sorted, 75.0);

        let reach = WHISKER_IQR_FACTOR * (q3 - q1);
        let low_fence = q1 - reach;
        let high_fence = q3 + reach;

        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < low_fence || v > high_fence)
            .collect();

        Some(BoxStats {
            label: label.to_string(),
            count: sorted.len(),
            q1,
            median,
            q3,
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_matches_numpy_linear() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        // numpy.percentile([1, 2, 3, 4], [0, 25, 50, 90, 100])
        assert_eq!(StatsCalculator::percentile(&sorted, 0.0), 1.0);
        assert!((StatsCalculator::percentile(&sorted, 25.0) - 1.75).abs() < 1e-12);
        assert!((StatsCalculator::percentile(&sorted, 50.0) - 2.5).abs() < 1e-12);
        assert!((StatsCalculator::percentile(&sorted, 90.0) - 3.7).abs() < 1e-12);
        assert_eq!(StatsCalculator::percentile(&sorted, 100.0), 4.0);
        assert!(StatsCalculator::percentile(&[], 50.0).is_nan());
    }

    #[test]
    fn summary_of_series() {
        let summary = StatsCalculator::compute_summary(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);

        assert_eq!(summary.count, 8);
        assert!((summary.mean - 5.0).abs() < 1e-12);
        assert!((summary.std - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 9.0);
    }

    #[test]
    fn box_stats_flags_outliers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 100.0];
        let stats = StatsCalculator::compute_box_stats("2017", &values).unwrap();

        assert_eq!(stats.label, "2017");
        assert_eq!(stats.count, 9);
        assert_eq!(stats.q1, 3.0);
        assert_eq!(stats.median, 5.0);
        assert_eq!(stats.q3, 7.0);
        assert_eq!(stats.lower_whisker, 1.0);
        assert_eq!(stats.upper_whisker, 8.0);
        assert_eq!(stats.outliers, vec![100.0]);
        assert_eq!(stats.extent(), (1.0, 100.0));
    }

    #[test]
    fn box_stats_single_value() {
        let stats = StatsCalculator::compute_box_stats("Jan", &[12.0]).unwrap();

        assert_eq!(stats.q1, stats.q3);
        assert_eq!(stats.lower_whisker, 12.0);
        assert_eq!(stats.upper_whisker, 12.0);
        assert!(stats.outliers.is_empty());
        assert!(StatsCalculator::compute_box_stats("Feb", &[]).is_none());
    }
}
