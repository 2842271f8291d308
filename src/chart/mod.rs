//! Chart Module
//!
//! Charts are descriptions ([`BarChart`]) handed to a [`ChartSink`]. The
//! raster sink draws grouped bars with the `image` crate; the output format
//! follows the file extension. Labels are not rasterised, so the chart
//! description is also logged for reference.

use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

use crate::error::SurveyResult;

const PALETTE: [[u8; 3]; 8] = [
    [70, 130, 180],  // steelblue
    [221, 132, 82],
    [85, 168, 104],
    [196, 78, 82],
    [129, 114, 179],
    [147, 120, 96],
    [218, 139, 195],
    [140, 140, 140],
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub group: String,
    pub series: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<Bar>,
}

impl BarChart {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_axes(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    pub fn push(&mut self, group: impl Into<String>, series: impl Into<String>, value: f64) {
        self.bars.push(Bar {
            group: group.into(),
            series: series.into(),
            value,
        });
    }

    /// Groups in first-appearance order
    pub fn groups(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for bar in &self.bars {
            if !seen.contains(&bar.group.as_str()) {
                seen.push(&bar.group);
            }
        }
        seen
    }

    /// Series in first-appearance order
    pub fn series(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for bar in &self.bars {
            if !seen.contains(&bar.series.as_str()) {
                seen.push(&bar.series);
            }
        }
        seen
    }

    pub fn max_value(&self) -> f64 {
        self.bars
            .iter()
            .map(|b| b.value)
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max)
    }
}

/// Destination for rendered charts
pub trait ChartSink: Send + Sync {
    fn render(&self, chart: &BarChart, path: &Path) -> SurveyResult<()>;
}

/// Draws grouped bar charts into image files
pub struct RasterChartSink {
    width: u32,
    height: u32,
}

impl RasterChartSink {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(120),
            height: height.max(120),
        }
    }

    fn fill_rect(img: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
        let (w, h) = img.dimensions();
        for x in x0.min(w)..x1.min(w) {
            for y in y0.min(h)..y1.min(h) {
                img.put_pixel(x, y, color);
            }
        }
    }

    pub fn draw(&self, chart: &BarChart) -> RgbImage {
        let mut img = RgbImage::from_pixel(self.width, self.height, Rgb([255, 255, 255]));
        let margin = 60;
        let left = margin;
        let right = self.width - margin / 2;
        let top = margin / 2;
        let bottom = self.height - margin;
        let plot_h = (bottom - top) as f64;

        // quarter gridlines
        for q in 1..=4 {
            let y = bottom - ((plot_h * q as f64 / 4.0) as u32);
            Self::fill_rect(&mut img, left, y, right, y + 1, Rgb([225, 225, 225]));
        }

        let groups = chart.groups();
        let series = chart.series();
        let max = chart.max_value();
        if !groups.is_empty() && max > 0.0 {
            let slot = (right - left) as f64 / groups.len() as f64;
            let bar_w = slot * 0.8 / series.len().max(1) as f64;

            for bar in &chart.bars {
                let (Some(g), Some(s)) = (
                    groups.iter().position(|g| *g == bar.group),
                    series.iter().position(|s| *s == bar.series),
                ) else {
                    continue;
                };
                let value = if bar.value.is_finite() { bar.value.max(0.0) } else { 0.0 };
                let x0 = left as f64 + slot * g as f64 + slot * 0.1 + bar_w * s as f64;
                let height = (value / max * plot_h) as u32;
                let [r, gr, b] = PALETTE[s % PALETTE.len()];
                Self::fill_rect(
                    &mut img,
                    x0 as u32,
                    bottom - height,
                    (x0 + bar_w).max(x0 + 1.0) as u32,
                    bottom,
                    Rgb([r, gr, b]),
                );
            }
        }

        // axes
        Self::fill_rect(&mut img, left, top, left + 2, bottom + 2, Rgb([0, 0, 0]));
        Self::fill_rect(&mut img, left, bottom, right, bottom + 2, Rgb([0, 0, 0]));
        img
    }
}

impl Default for RasterChartSink {
    fn default() -> Self {
        Self::new(900, 700)
    }
}

impl ChartSink for RasterChartSink {
    fn render(&self, chart: &BarChart, path: &Path) -> SurveyResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        self.draw(chart).save(path)?;
        info!(
            "rendered '{}' ({} bars, x: {}, y: {}) to {}",
            chart.title,
            chart.bars.len(),
            chart.x_label,
            chart.y_label,
            path.display()
        );
        Ok(())
    }
}

/// Keeps charts in memory instead of drawing them
#[derive(Default)]
pub struct RecordingChartSink {
    rendered: Mutex<Vec<(PathBuf, BarChart)>>,
}

impl RecordingChartSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rendered(&self) -> Vec<(PathBuf, BarChart)> {
        self.rendered.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl ChartSink for RecordingChartSink {
    fn render(&self, chart: &BarChart, path: &Path) -> SurveyResult<()> {
        if let Ok(mut rendered) = self.rendered.lock() {
            rendered.push((path.to_path_buf(), chart.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn chart() -> BarChart {
        let mut chart = BarChart::new("Mean Preference Ratings").with_axes("Rating", "Average");
        chart.push("age", "objective", 60.0);
        chart.push("color", "objective", 40.0);
        chart.push("age", "subjective", 20.0);
        chart
    }

    #[test]
    fn test_groups_and_series_keep_first_appearance() {
        let chart = chart();
        assert_eq!(chart.groups(), vec!["age", "color"]);
        assert_eq!(chart.series(), vec!["objective", "subjective"]);
        assert_eq!(chart.max_value(), 60.0);
    }

    #[test]
    fn test_tallest_bar_reaches_plot_top() {
        let sink = RasterChartSink::new(400, 300);
        let img = sink.draw(&chart());
        // first bar of group "age", series 0 starts at x = 60 + 0.1 * slot
        let slot = (400.0 - 30.0 - 60.0) / 2.0;
        let x = (60.0 + slot * 0.1 + 2.0) as u32;
        assert_eq!(*img.get_pixel(x, 31), Rgb(PALETTE[0]));
    }

    #[test]
    fn test_raster_sink_writes_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("charts").join("results.png");
        RasterChartSink::default().render(&chart(), &path).unwrap();
        assert!(path.exists());
    }
}
