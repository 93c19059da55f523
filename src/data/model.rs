//! Data Model Module
//! Page-view records and the date-ordered dataset shared by every chart.

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

/// Column names used by the derived frames.
pub const DATE_COLUMN: &str = "date";
pub const VALUE_COLUMN: &str = "value";
pub const YEAR_COLUMN: &str = "year";
pub const MONTH_COLUMN: &str = "month";

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Full month name for a 1-based month number.
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
        .unwrap_or_default()
}

/// Three-letter month abbreviation for a 1-based month number.
pub fn month_abbreviation(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_ABBREVIATIONS.get(i as usize))
        .copied()
        .unwrap_or_default()
}

/// A single day of page views.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageView {
    pub date: NaiveDate,
    pub value: f64,
}

impl PageView {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Page views ordered by date ascending.
///
/// Equal dates keep their input order; uniqueness is not enforced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<PageView>,
}

impl Dataset {
    pub fn from_records(mut records: Vec<PageView>) -> Self {
        records.sort_by_key(|r| r.date);
        Self { records }
    }

    pub fn records(&self) -> &[PageView] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.value).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.records.iter().map(|r| r.date).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }

    /// Keep only the records matching `predicate`, preserving order.
    pub fn retain_by<F>(&self, predicate: F) -> Self
    where
        F: Fn(&PageView) -> bool,
    {
        Self {
            records: self
                .records
                .iter()
                .filter(|r| predicate(*r))
                .copied()
                .collect(),
        }
    }

    /// Build a fresh frame with the calendar parts of each date.
    ///
    /// Output columns: ["year", "month", "value"]
    pub fn to_frame_with_date_parts(&self) -> PolarsResult<DataFrame> {
        let mut years: Vec<i32> = Vec::with_capacity(self.len());
        let mut months: Vec<u32> = Vec::with_capacity(self.len());
        let mut values: Vec<f64> = Vec::with_capacity(self.len());

        for record in &self.records {
            years.push(record.date.year());
            months.push(record.date.month());
            values.push(record.value);
        }

        DataFrame::new(vec![
            Column::new(YEAR_COLUMN.into(), years),
            Column::new(MONTH_COLUMN.into(), months),
            Column::new(VALUE_COLUMN.into(), values),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn from_records_orders_by_date() {
        let dataset = Dataset::from_records(vec![
            PageView::new(day(2017, 3, 1), 3.0),
            PageView::new(day(2016, 5, 9), 1.0),
            PageView::new(day(2016, 12, 31), 2.0),
        ]);

        assert_eq!(
            dataset.dates(),
            vec![day(2016, 5, 9), day(2016, 12, 31), day(2017, 3, 1)]
        );
        assert_eq!(dataset.values(), vec![1.0, 2.0, 3.0]);
        assert_eq!(dataset.first_date(), Some(day(2016, 5, 9)));
        assert_eq!(dataset.last_date(), Some(day(2017, 3, 1)));
    }

    #[test]
    fn frame_carries_year_and_month() {
        let dataset = Dataset::from_records(vec![
            PageView::new(day(2018, 2, 14), 10.0),
            PageView::new(day(2019, 11, 3), 20.0),
        ]);
        let df = dataset.to_frame_with_date_parts().unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
        let years: Vec<Option<i32>> = df
            .column(YEAR_COLUMN)
            .unwrap()
            .i32()
            .unwrap()
            .into_iter()
            .collect();
        let months: Vec<Option<u32>> = df
            .column(MONTH_COLUMN)
            .unwrap()
            .u32()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(years, vec![Some(2018), Some(2019)]);
        assert_eq!(months, vec![Some(2), Some(11)]);
    }

    #[test]
    fn month_labels() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_abbreviation(9), "Sep");
        assert_eq!(month_name(0), "");
        assert_eq!(month_abbreviation(13), "");
    }
}
