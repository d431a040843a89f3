//! Static Chart Renderer
//! Writes the dashboard bar charts to PNG files with plotters.

use crate::report::{BarSeries, DashboardReport};
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

const BAR_COLOR: RGBColor = RGBColor(52, 152, 219);
const NEGATIVE_COLOR: RGBColor = RGBColor(231, 76, 60);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to create output directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to draw chart: {0}")]
    Draw(String),
}

fn draw_err(e: impl std::fmt::Display) -> RenderError {
    RenderError::Draw(e.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render every non-empty bar series of a report into `dir`.
    pub fn export_report(
        report: &DashboardReport,
        dir: &Path,
        width: u32,
        height: u32,
    ) -> Result<Vec<PathBuf>, RenderError> {
        std::fs::create_dir_all(dir).map_err(|source| RenderError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut written = Vec::new();
        for (idx, series) in report.bar_series().iter().enumerate() {
            if series.bars.is_empty() {
                tracing::debug!(title = %series.title, "Skipping empty chart");
                continue;
            }

            let path = dir.join(format!("{:02}_{}.png", idx + 1, file_slug(&series.title)));
            Self::render_bar_chart(series, &path, width, height)?;
            written.push(path);
        }

        tracing::info!(count = written.len(), dir = %dir.display(), "Exported charts");
        Ok(written)
    }

    /// Render one bar chart to a PNG file. The series must not be empty.
    pub fn render_bar_chart(
        series: &BarSeries,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let count = series.bars.len() as u32;
        let (y_min, y_max) = value_range(&series.bars);
        let labels: Vec<&str> = series.bars.iter().map(|(l, _)| l.as_str()).collect();

        let mut chart = ChartBuilder::on(&root)
            .caption(&series.title, ("sans-serif", 28))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(90)
            .build_cartesian_2d((0u32..count).into_segmented(), y_min..y_max)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(series.bars.len())
            .x_desc(series.x_label.as_str())
            .y_desc(series.y_label.as_str())
            .x_label_formatter(&|value: &SegmentValue<u32>| match value {
                SegmentValue::CenterOf(idx) => labels
                    .get(*idx as usize)
                    .map(|l| l.to_string())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(series.bars.iter().enumerate().map(|(idx, (_, value))| {
                let idx = idx as u32;
                let (low, high, color) = if *value >= 0.0 {
                    (0.0, *value, BAR_COLOR)
                } else {
                    (*value, 0.0, NEGATIVE_COLOR)
                };
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(idx), low),
                        (SegmentValue::Exact(idx + 1), high),
                    ],
                    color.filled(),
                );
                bar.set_margin(0, 0, 6, 6);
                bar
            }))
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }
}

/// Y-axis range covering every value and zero, with headroom.
pub fn value_range(bars: &[(String, f64)]) -> (f64, f64) {
    let (lo, hi) = bars
        .iter()
        .map(|(_, v)| *v)
        .filter(|v| v.is_finite())
        .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if lo == hi {
        return (0.0, 1.0);
    }

    let pad = (hi - lo) * 0.1;
    (if lo < 0.0 { lo - pad } else { 0.0 }, hi + pad)
}

/// Lowercase file name stem made of ASCII alphanumerics and underscores.
pub fn file_slug(title: &str) -> String {
    title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}
