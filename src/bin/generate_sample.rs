//! Writes a synthetic `fcc-forum-pageviews.csv` so the visualizer can run
//! without the real dataset. An existing file is never overwritten.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use env_logger::Env;
use log::{info, warn};
use std::path::Path;
use time_series_visualizer::config::DEFAULT_INPUT;
use time_series_visualizer::data::SampleGenerator;

const SEED: u64 = 42;
/// 2016-05-09 through 2019-12-03
const DAYS: usize = 1304;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let path = Path::new(DEFAULT_INPUT);
    if path.exists() {
        warn!("{} already exists, leaving it untouched", path.display());
        return Ok(());
    }

    let start = NaiveDate::from_ymd_opt(2016, 5, 9).context("invalid start date")?;
    let dataset = SampleGenerator::new(SEED).generate(start, DAYS);

    SampleGenerator::write_csv(&dataset, path)
        .with_context(|| format!("writing {}", path.display()))?;

    info!(
        "Wrote {} rows ({} .. {}) to {}",
        dataset.len(),
        dataset.first_date().map(|d| d.to_string()).unwrap_or_default(),
        dataset.last_date().map(|d| d.to_string()).unwrap_or_default(),
        path.display()
    );
    Ok(())
}
