//! Static Chart Renderer
//! Draws the three page-view charts to PNG files with plotters.
//!
//! Layout:
//! 1. Line plot: daily values against date
//! 2. Bar plot: monthly averages, one cluster per year, one bar per month
//! 3. Box plot: two panels side-by-side
//!    - Left: distribution per year (trend)
//!    - Right: distribution per month, Jan..Dec (seasonality)

use crate::charts::{BarChartData, BoxChartData, ChartPlotter, LineChartData};
use crate::config::VisualizerConfig;
use crate::data::{Dataset, ProcessorError, MONTH_NAMES};
use crate::stats::BoxStats;
use chrono::NaiveDate;
use log::{debug, info};
use plotters::coord::Shift;
use plotters::prelude::*;
use rayon::prelude::*;
use std::error::Error as StdError;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const LINE_TITLE: &str = "Daily freeCodeCamp Forum Page Views 5/2016-12/2019";
pub const YEAR_BOX_TITLE: &str = "Year-wise Box Plot (Trend)";
pub const MONTH_BOX_TITLE: &str = "Month-wise Box Plot (Seasonality)";

const FONT: &str = "sans-serif";
/// Tick labels below this size lose the top of tall glyphs such as "J".
const TICK_LABEL_SIZE: u32 = 14;
const LINE_COLOR: RGBColor = RED;
/// Share of a year slot covered by its twelve bars.
const BAR_GROUP_WIDTH: f64 = 0.8;
/// Share of a category slot covered by a box.
const BOX_WIDTH: f64 = 0.6;

type DrawResult = Result<(), Box<dyn StdError>>;

/// The three charts produced on every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Line,
    Bar,
    Box,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Line, ChartKind::Bar, ChartKind::Box];

    pub fn file_name(self) -> &'static str {
        match self {
            ChartKind::Line => "line_plot.png",
            ChartKind::Bar => "bar_plot.png",
            ChartKind::Box => "box_plot.png",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Box => "box",
        };
        write!(f, "{name} plot")
    }
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to prepare {chart} data: {source}")]
    Data {
        chart: ChartKind,
        #[source]
        source: ProcessorError,
    },
    #[error("Failed to draw {}: {message}", .path.display())]
    Drawing { path: PathBuf, message: String },
}

impl RenderError {
    fn drawing(path: &Path, err: Box<dyn StdError>) -> Self {
        RenderError::Drawing {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render every chart in parallel.
    ///
    /// Charts are independent: one failing does not stop the others.
    pub fn render_all(
        dataset: &Dataset,
        config: &VisualizerConfig,
    ) -> Vec<(ChartKind, Result<PathBuf, RenderError>)> {
        ChartKind::ALL
            .par_iter()
            .map(|&kind| (kind, Self::render(kind, dataset, config)))
            .collect()
    }

    /// Render one chart and return the path it was written to.
    pub fn render(
        kind: ChartKind,
        dataset: &Dataset,
        config: &VisualizerConfig,
    ) -> Result<PathBuf, RenderError> {
        let path = config.output_path(kind);
        let size = config.canvas_size(kind);

        match kind {
            ChartKind::Line => {
                let data = LineChartData::from_dataset(dataset);
                Self::draw_line_plot(&data, &path, size)?;
            }
            ChartKind::Bar => {
                let data = BarChartData::from_dataset(dataset)
                    .map_err(|source| RenderError::Data { chart: kind, source })?;
                debug!("bar plot: {} years, {} groups", data.years.len(), data.means.len());
                Self::draw_bar_plot(&data, &path, size)?;
            }
            ChartKind::Box => {
                let data = BoxChartData::from_dataset(dataset)
                    .map_err(|source| RenderError::Data { chart: kind, source })?;
                debug!("box plot: {} year boxes", data.by_year.len());
                Self::draw_box_plot(&data, &path, size)?;
            }
        }

        info!("Wrote {kind} to {}", path.display());
        Ok(path)
    }

    fn draw_line_plot(
        data: &LineChartData,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        Self::draw_line(data, path, size).map_err(|e| RenderError::drawing(path, e))
    }

    fn draw_bar_plot(
        data: &BarChartData,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        Self::draw_bars(data, path, size).map_err(|e| RenderError::drawing(path, e))
    }

    fn draw_box_plot(
        data: &BoxChartData,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        Self::draw_boxes(data, path, size).map_err(|e| RenderError::drawing(path, e))
    }

    /// Font for categorical tick labels (years, month abbreviations).
    fn tick_label_style() -> TextStyle<'static> {
        TextStyle::from((FONT, TICK_LABEL_SIZE).into_font())
    }

    fn draw_line(data: &LineChartData, path: &Path, size: (u32, u32)) -> DrawResult {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;

        let (start, end) = data.date_span();
        let (y_min, y_max) = data.value_range();

        let mut chart = ChartBuilder::on(&root)
            .caption(LINE_TITLE, (FONT, 22))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(start..end, y_min..y_max)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("Date")
            .y_desc("Page Views")
            .x_label_formatter(&|d: &NaiveDate| d.format("%Y-%m").to_string())
            .y_label_formatter(&|v: &f64| format!("{:.0}", v))
            .draw()?;

        chart.draw_series(LineSeries::new(data.points.iter().copied(), &LINE_COLOR))?;

        root.present()?;
        Ok(())
    }

    fn draw_bars(data: &BarChartData, path: &Path, size: (u32, u32)) -> DrawResult {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;

        let year_labels: Vec<String> = data.years.iter().map(|y| y.to_string()).collect();
        let y_max = if data.max_mean() > 0.0 {
            data.max_mean() * 1.1
        } else {
            1.0
        };

        let mut chart = ChartBuilder::on(&root)
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(
                ChartPlotter::category_range(data.years.len()),
                0.0..y_max,
            )?;

        let year_formatter = |x: &f64| ChartPlotter::category_label(&year_labels, *x);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(data.years.len().max(1))
            .x_label_formatter(&year_formatter)
            .x_label_style(Self::tick_label_style())
            .y_label_formatter(&|v: &f64| format!("{:.0}", v))
            .x_desc("Years")
            .y_desc("Average Page Views")
            .draw()?;

        // Legend heading; draws nothing on the plot itself.
        chart
            .draw_series(std::iter::empty::<Circle<(f64, f64), i32>>())?
            .label("Months")
            .legend(|(x, y)| EmptyElement::<_, BitMapBackend>::at((x, y)));

        let slot = BAR_GROUP_WIDTH / MONTH_NAMES.len() as f64;
        for (idx, name) in MONTH_NAMES.iter().enumerate() {
            let month = idx as u32 + 1;
            let color = ChartPlotter::get_color(idx);
            let offset = -BAR_GROUP_WIDTH / 2.0 + slot * idx as f64;

            chart
                .draw_series(data.years.iter().enumerate().filter_map(|(i, &year)| {
                    data.mean(year, month).map(|mean| {
                        let x0 = i as f64 + offset;
                        Rectangle::new([(x0, 0.0), (x0 + slot, mean)], color.filled())
                    })
                }))?
                .label(*name)
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                });
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font((FONT, 14))
            .draw()?;

        root.present()?;
        Ok(())
    }

    fn draw_boxes(data: &BoxChartData, path: &Path, size: (u32, u32)) -> DrawResult {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;

        let panels = root.split_evenly((1, 2));
        let y_range = data.value_range();

        let year_boxes: Vec<Option<&BoxStats>> = data.by_year.iter().map(Some).collect();
        Self::draw_box_panel(
            &panels[0],
            YEAR_BOX_TITLE,
            "Year",
            &data.year_labels(),
            &year_boxes,
            y_range,
        )?;

        let month_boxes: Vec<Option<&BoxStats>> =
            data.by_month.iter().map(|(_, s)| s.as_ref()).collect();
        Self::draw_box_panel(
            &panels[1],
            MONTH_BOX_TITLE,
            "Month",
            &data.month_labels(),
            &month_boxes,
            y_range,
        )?;

        root.present()?;
        Ok(())
    }

    fn draw_box_panel(
        area: &DrawingArea<BitMapBackend<'_>, Shift>,
        title: &str,
        x_desc: &str,
        labels: &[String],
        boxes: &[Option<&BoxStats>],
        (y_min, y_max): (f64, f64),
    ) -> DrawResult {
        let mut chart = ChartBuilder::on(area)
            .caption(title, (FONT, 20))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(ChartPlotter::category_range(labels.len()), y_min..y_max)?;

        let formatter = |x: &f64| ChartPlotter::category_label(labels, *x);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len().max(1))
            .x_label_formatter(&formatter)
            .x_label_style(Self::tick_label_style())
            .y_label_formatter(&|v: &f64| format!("{:.0}", v))
            .x_desc(x_desc)
            .y_desc("Page Views")
            .draw()?;

        let half = BOX_WIDTH / 2.0;
        for (i, stats) in boxes.iter().enumerate() {
            let Some(s) = stats else {
                continue;
            };
            let x = i as f64;
            let color = ChartPlotter::get_color(i);

            // Box (filled, then outlined)
            chart.draw_series(std::iter::once(Rectangle::new(
                [(x - half, s.q1), (x + half, s.q3)],
                color.mix(0.7).filled(),
            )))?;
            chart.draw_series(std::iter::once(Rectangle::new(
                [(x - half, s.q1), (x + half, s.q3)],
                BLACK.stroke_width(1),
            )))?;

            // Median
            chart.draw_series(std::iter::once(PathElement::new(
                vec![(x - half, s.median), (x + half, s.median)],
                BLACK.stroke_width(2),
            )))?;

            // Whiskers and caps
            let cap = half / 2.0;
            chart.draw_series(
                [
                    vec![(x, s.q1), (x, s.lower_whisker)],
                    vec![(x, s.q3), (x, s.upper_whisker)],
                    vec![(x - cap, s.lower_whisker), (x + cap, s.lower_whisker)],
                    vec![(x - cap, s.upper_whisker), (x + cap, s.upper_whisker)],
                ]
                .into_iter()
                .map(|points| PathElement::new(points, BLACK)),
            )?;

            // Outliers
            chart.draw_series(
                s.outliers
                    .iter()
                    .map(|&v| Circle::new((x, v), 3, BLACK.stroke_width(1))),
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{PageView, SampleGenerator};
    use tempfile::TempDir;

    #[test]
    fn output_file_names() {
        assert_eq!(ChartKind::Line.file_name(), "line_plot.png");
        assert_eq!(ChartKind::Bar.file_name(), "bar_plot.png");
        assert_eq!(ChartKind::Box.file_name(), "box_plot.png");
        assert_eq!(ChartKind::Box.to_string(), "box plot");
    }

    #[test]
    fn drawing_error_names_the_path() {
        let err = RenderError::drawing(Path::new("out/line_plot.png"), "disk full".into());
        assert_eq!(err.to_string(), "Failed to draw out/line_plot.png: disk full");
    }

    #[test]
    fn category_ticks_use_readable_font() {
        let style = StaticChartRenderer::tick_label_style();

        assert_eq!(style.font.get_name(), FONT);
        assert!(style.font.get_size() >= 14.0);
    }

    #[test]
    #[ignore = "needs a system sans-serif font"]
    fn renders_all_charts_at_configured_sizes() {
        let dir = TempDir::new().unwrap();
        let config = VisualizerConfig::default().with_output_dir(dir.path());
        let start = NaiveDate::from_ymd_opt(2016, 5, 9).unwrap();
        let dataset = SampleGenerator::new(3).generate(start, 400);

        let results = StaticChartRenderer::render_all(&dataset, &config);

        assert_eq!(results.len(), 3);
        for (kind, result) in results {
            let path = result.unwrap();
            assert_eq!(path, dir.path().join(kind.file_name()));
            let img = image::open(&path).unwrap();
            let (w, h) = config.canvas_size(kind);
            assert_eq!((img.width(), img.height()), (w, h));
        }
    }

    #[test]
    #[ignore = "needs a system sans-serif font"]
    fn renders_degenerate_datasets() {
        let dir = TempDir::new().unwrap();
        let config = VisualizerConfig::default().with_output_dir(dir.path());
        let single = Dataset::from_records(vec![PageView::new(
            NaiveDate::from_ymd_opt(2018, 7, 1).unwrap(),
            500.0,
        )]);

        for dataset in [Dataset::default(), single] {
            for kind in ChartKind::ALL {
                StaticChartRenderer::render(kind, &dataset, &config).unwrap();
                assert!(dir.path().join(kind.file_name()).is_file());
            }
        }
    }
}
