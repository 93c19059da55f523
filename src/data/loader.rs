//! CSV Data Loader Module
//! Reads the daily page-view CSV with Polars and turns it into a date-ordered dataset.

use super::model::{Dataset, PageView, DATE_COLUMN, VALUE_COLUMN};
use chrono::NaiveDate;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Accepted date layout for the `date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("Row {row}: cannot parse date '{text}' (expected YYYY-MM-DD)")]
    InvalidDate { row: usize, text: String },
    #[error("Row {row}: value '{text}' is not numeric")]
    InvalidValue { row: usize, text: String },
}

/// Handles CSV file loading with Polars.
///
/// Any malformed row aborts the load; a partial dataset is never returned.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Load a CSV file and parse it into a [`Dataset`] ordered by date.
    pub fn load_csv(&mut self, file_path: &Path) -> Result<Dataset, LoaderError> {
        if !file_path.is_file() {
            return Err(LoaderError::NotFound(file_path.to_path_buf()));
        }
        self.file_path = Some(file_path.to_path_buf());

        let df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .finish()?
            .collect()?;

        let dataset = Self::parse_records(&df)?;
        self.df = Some(df);
        Ok(dataset)
    }

    fn parse_records(df: &DataFrame) -> Result<Dataset, LoaderError> {
        let date_col = df
            .column(DATE_COLUMN)
            .map_err(|_| LoaderError::MissingColumn(DATE_COLUMN))?
            .cast(&DataType::String)?;
        let value_col = df
            .column(VALUE_COLUMN)
            .map_err(|_| LoaderError::MissingColumn(VALUE_COLUMN))?;

        // Non-numeric text becomes null on the non-strict cast; keep the raw
        // text around so the error can quote it.
        let value_f64 = value_col.cast(&DataType::Float64)?;
        let value_text = value_col.cast(&DataType::String)?;

        let dates = date_col.str()?;
        let values = value_f64.f64()?;
        let texts = value_text.str()?;

        let mut records = Vec::with_capacity(df.height());
        for (i, ((date, value), text)) in dates
            .into_iter()
            .zip(values.into_iter())
            .zip(texts.into_iter())
            .enumerate()
        {
            let row = i + 1;
            let date_text = date.unwrap_or_default();
            let date = NaiveDate::parse_from_str(date_text.trim(), DATE_FORMAT)
                .map_err(|_| LoaderError::InvalidDate {
                    row,
                    text: date_text.to_string(),
                })?;
            let value = value
                .filter(|v| v.is_finite())
                .ok_or_else(|| LoaderError::InvalidValue {
                    row,
                    text: text.unwrap_or_default().to_string(),
                })?;

            records.push(PageView::new(date, value));
        }

        Ok(Dataset::from_records(records))
    }

    /// Get list of column names from the loaded file.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the number of rows in the loaded file.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("pageviews.csv");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_and_sorts_by_date() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            &dir,
            "date,value\n2016-05-11,1000\n2016-05-09,1201\n2016-05-10,2329\n",
        );

        let mut loader = DataLoader::new();
        let dataset = loader.load_csv(&path).unwrap();

        assert_eq!(loader.get_row_count(), 3);
        assert_eq!(loader.get_columns(), vec!["date", "value"]);
        assert_eq!(loader.get_file_path(), Some(&path));
        assert_eq!(dataset.values(), vec![1201.0, 2329.0, 1000.0]);
        assert_eq!(dataset.first_date(), NaiveDate::from_ymd_opt(2016, 5, 9));
    }

    #[test]
    fn ignores_extra_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "id,value,date\n1,5,2019-01-02\n2,7,2019-01-01\n");

        let dataset = DataLoader::new().load_csv(&path).unwrap();
        assert_eq!(dataset.values(), vec![7.0, 5.0]);
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = DataLoader::new()
            .load_csv(&dir.path().join("absent.csv"))
            .unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(_)));
    }

    #[test]
    fn missing_value_column_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "date,views\n2016-05-09,1201\n");

        let err = DataLoader::new().load_csv(&path).unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn("value")));
    }

    #[test]
    fn malformed_date_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "date,value\n2016-05-09,1201\n09/05/2016,1300\n");

        let err = DataLoader::new().load_csv(&path).unwrap_err();
        match err {
            LoaderError::InvalidDate { row, text } => {
                assert_eq!(row, 2);
                assert_eq!(text, "09/05/2016");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_numeric_value_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "date,value\n2016-05-09,1201\n2016-05-10,lots\n");

        let err = DataLoader::new().load_csv(&path).unwrap_err();
        match err {
            LoaderError::InvalidValue { row, text } => {
                assert_eq!(row, 2);
                assert_eq!(text, "lots");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn header_only_file_yields_empty_dataset() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "date,value\n");

        let dataset = DataLoader::new().load_csv(&path).unwrap();
        assert!(dataset.is_empty());
    }
}
