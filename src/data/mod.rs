//! Data module - CSV loading, cleaning and grouping

mod loader;
mod model;
mod processor;
mod sample;

pub use loader::{DataLoader, LoaderError, DATE_FORMAT};
pub use model::{
    month_abbreviation, month_name, Dataset, PageView, DATE_COLUMN, MONTH_ABBREVIATIONS,
    MONTH_COLUMN, MONTH_NAMES, VALUE_COLUMN, YEAR_COLUMN,
};
pub use processor::{DataProcessor, ProcessorError, QuantileBounds};
pub use sample::SampleGenerator;
