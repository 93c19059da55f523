//! Time Series Visualizer
//!
//! Reads `fcc-forum-pageviews.csv` from the working directory and writes the
//! three page-view charts next to it.

use anyhow::{bail, Context, Result};
use env_logger::Env;
use log::{debug, error, info};
use time_series_visualizer::charts::{ChartKind, StaticChartRenderer};
use time_series_visualizer::config::VisualizerConfig;
use time_series_visualizer::data::{DataLoader, DataProcessor, Dataset};
use time_series_visualizer::stats::StatsCalculator;

fn log_summary(stage: &str, dataset: &Dataset) {
    let summary = StatsCalculator::compute_summary(&dataset.values());
    info!(
        "{stage}: {} rows ({} .. {}), mean {:.1}, std {:.1}, min {:.0}, max {:.0}",
        summary.count,
        dataset
            .first_date()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".into()),
        dataset
            .last_date()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".into()),
        summary.mean,
        summary.std,
        summary.min,
        summary.max,
    );
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = VisualizerConfig::default();

    let mut loader = DataLoader::new();
    let dataset = loader
        .load_csv(&config.input_path)
        .with_context(|| format!("loading {}", config.input_path.display()))?;
    if let Some(path) = loader.get_file_path() {
        debug!("columns of {}: {:?}", path.display(), loader.get_columns());
    }
    log_summary("Loaded", &dataset);

    let (cleaned, bounds) =
        DataProcessor::remove_outliers(&dataset, config.lower_quantile, config.upper_quantile)
            .context("removing outliers")?;
    info!(
        "Kept values in [{:.1}, {:.1}]: {} of {} rows",
        bounds.lower,
        bounds.upper,
        cleaned.len(),
        loader.get_row_count()
    );
    log_summary("Cleaned", &cleaned);

    let mut failed = 0;
    for (kind, result) in StaticChartRenderer::render_all(&cleaned, &config) {
        match result {
            Ok(path) => println!("{}: {}", kind, path.display()),
            Err(e) => {
                error!("{e}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} charts failed", ChartKind::ALL.len());
    }
    Ok(())
}
