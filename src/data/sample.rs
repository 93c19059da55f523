//! Synthetic page-view data.
//!
//! Produces a deterministic daily series shaped like forum traffic: slow
//! growth, a weekday/weekend cycle, yearly seasonality, gaussian noise and a
//! handful of spikes, so the full pipeline can run without the real dataset.

use super::model::{Dataset, PageView, DATE_COLUMN, VALUE_COLUMN};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use polars::prelude::*;
use std::f64::consts::PI;
use std::fs::File;
use std::path::Path;

const BASE_VIEWS: f64 = 15_000.0;
const DAILY_GROWTH: f64 = 40.0;
const NOISE_FRACTION: f64 = 0.08;
const SPIKE_PROBABILITY: f64 = 0.01;
const SPIKE_FACTOR: f64 = 6.0;

/// Deterministic generator of daily page-view series.
pub struct SampleGenerator {
    state: u64,
}

impl SampleGenerator {
    pub fn new(seed: u64) -> Self {
        // xorshift never leaves the zero state
        Self {
            state: seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1,
        }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Standard normal draw (Box-Muller).
    fn next_gaussian(&mut self) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// `days` consecutive daily records starting at `start`.
    pub fn generate(&mut self, start: NaiveDate, days: usize) -> Dataset {
        let records = (0..days)
            .filter_map(|i| {
                let date = start.checked_add_days(Days::new(i as u64))?;
                Some(PageView::new(date, self.views_on(date, i)))
            })
            .collect();
        Dataset::from_records(records)
    }

    fn views_on(&mut self, date: NaiveDate, day_index: usize) -> f64 {
        let trend = BASE_VIEWS + DAILY_GROWTH * day_index as f64;
        let weekly = match date.weekday() {
            Weekday::Sat | Weekday::Sun => 0.75,
            _ => 1.05,
        };
        // Traffic peaks in late winter and dips in December.
        let yearly = 1.0 + 0.15 * (2.0 * PI * (date.ordinal() as f64 - 30.0) / 365.25).cos();

        let mut views = trend * weekly * yearly * (1.0 + NOISE_FRACTION * self.next_gaussian());
        if self.next_f64() < SPIKE_PROBABILITY {
            views *= SPIKE_FACTOR;
        }
        views.max(0.0).round()
    }

    /// Write `dataset` as a `date,value` CSV.
    pub fn write_csv(dataset: &Dataset, path: &Path) -> PolarsResult<()> {
        let dates: Vec<String> = dataset
            .dates()
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect();
        let values: Vec<i64> = dataset.values().iter().map(|&v| v as i64).collect();

        let mut df = DataFrame::new(vec![
            Column::new(DATE_COLUMN.into(), dates),
            Column::new(VALUE_COLUMN.into(), values),
        ])?;

        let mut file = File::create(path)?;
        CsvWriter::new(&mut file).include_header(true).finish(&mut df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2016, 5, 9).unwrap()
    }

    #[test]
    fn same_seed_same_series() {
        let a = SampleGenerator::new(7).generate(start(), 60);
        let b = SampleGenerator::new(7).generate(start(), 60);
        let c = SampleGenerator::new(8).generate(start(), 60);

        assert_eq!(a, b);
        assert_ne!(a.values(), c.values());
    }

    #[test]
    fn consecutive_days_from_start() {
        let dataset = SampleGenerator::new(1).generate(start(), 1000);

        assert_eq!(dataset.len(), 1000);
        assert_eq!(dataset.first_date(), Some(start()));
        assert_eq!(dataset.last_date(), Some(start() + Days::new(999)));
        assert!(dataset.values().iter().all(|v| *v >= 0.0));
    }
}
