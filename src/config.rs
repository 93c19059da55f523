//! Visualizer Configuration
//! Fixed input/output locations, outlier cutoffs and canvas sizes.

use crate::charts::ChartKind;
use std::path::{Path, PathBuf};

/// Dataset read from the working directory.
pub const DEFAULT_INPUT: &str = "fcc-forum-pageviews.csv";

/// Fraction of the value distribution cut from each tail.
pub const LOWER_QUANTILE: f64 = 0.025;
pub const UPPER_QUANTILE: f64 = 0.975;

/// Pipeline settings. The binary always runs with [`Default`].
#[derive(Debug, Clone)]
pub struct VisualizerConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub lower_quantile: f64,
    pub upper_quantile: f64,
    pub line_size: (u32, u32),
    pub bar_size: (u32, u32),
    pub box_size: (u32, u32),
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from("."),
            lower_quantile: LOWER_QUANTILE,
            upper_quantile: UPPER_QUANTILE,
            // 100 px per figure inch
            line_size: (1500, 500),
            bar_size: (1200, 800),
            box_size: (1500, 600),
        }
    }
}

impl VisualizerConfig {
    pub fn with_input_path(mut self, path: impl AsRef<Path>) -> Self {
        self.input_path = path.as_ref().to_path_buf();
        self
    }

    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Where a chart is written; the file name is fixed per chart.
    pub fn output_path(&self, kind: ChartKind) -> PathBuf {
        self.output_dir.join(kind.file_name())
    }

    pub fn canvas_size(&self, kind: ChartKind) -> (u32, u32) {
        match kind {
            ChartKind::Line => self.line_size,
            ChartKind::Bar => self.bar_size,
            ChartKind::Box => self.box_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixed_pipeline() {
        let config = VisualizerConfig::default();

        assert_eq!(config.input_path, PathBuf::from("fcc-forum-pageviews.csv"));
        assert_eq!(config.lower_quantile, 0.025);
        assert_eq!(config.upper_quantile, 0.975);
        assert_eq!(config.output_path(ChartKind::Bar), Path::new("./bar_plot.png"));
        assert_eq!(config.canvas_size(ChartKind::Line), (1500, 500));
    }

    #[test]
    fn output_dir_redirects_every_chart() {
        let config = VisualizerConfig::default().with_output_dir("/tmp/charts");

        for kind in ChartKind::ALL {
            assert_eq!(
                config.output_path(kind),
                Path::new("/tmp/charts").join(kind.file_name())
            );
        }
    }
}
