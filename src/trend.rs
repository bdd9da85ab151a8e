//! # Trend chart
//! Renders the full observation history as a PNG time series, overwriting the
//! same file on every call.
//!
//! The chart is text-free (no caption, no tick labels) so no font backend is
//! needed: x = time, y = sentiment on a fixed [-1, 1] scale, plus a grey zero
//! line and a red line at the alert threshold.

use plotters::prelude::*;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::history::Observation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered(PathBuf),
    /// Empty history; nothing written.
    Skipped,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("creating plot folder {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("drawing {path}: {detail}")]
    Draw { path: PathBuf, detail: String },
}

pub trait TrendRenderer: Send + Sync {
    fn render(&self, history: &[Observation]) -> Result<RenderOutcome, RenderError>;
}

#[derive(Debug, Clone)]
pub struct PngTrendRenderer {
    path: PathBuf,
    threshold: f64,
    size: (u32, u32),
}

impl PngTrendRenderer {
    pub fn new(path: impl Into<PathBuf>, threshold: f64) -> Self {
        Self {
            path: path.into(),
            threshold,
            size: (1000, 600),
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width.max(1), height.max(1));
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn draw(&self, points: &[(i64, f64)]) -> Result<(), Box<dyn std::error::Error>> {
        let x0 = points.first().map(|p| p.0).unwrap_or_default();
        let last = points.last().map(|p| p.0).unwrap_or_default();
        // A single instant still needs a non-degenerate axis.
        let x1 = if last > x0 { last } else { x0 + 1 };
        let t = self.threshold.clamp(-1.0, 1.0);

        let root = BitMapBackend::new(&self.path, self.size).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .build_cartesian_2d(x0..x1, -1.0f64..1.0f64)?;

        chart.draw_series(LineSeries::new([(x0, 0.0), (x1, 0.0)], &BLACK.mix(0.3)))?;
        chart.draw_series(LineSeries::new([(x0, t), (x1, t)], &RED.mix(0.6)))?;
        chart.draw_series(LineSeries::new(points.iter().copied(), &BLUE))?;
        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, BLUE.filled())),
        )?;

        root.present()?;
        Ok(())
    }
}

impl TrendRenderer for PngTrendRenderer {
    fn render(&self, history: &[Observation]) -> Result<RenderOutcome, RenderError> {
        if history.is_empty() {
            tracing::debug!(target: "trend", "empty history, chart not rendered");
            return Ok(RenderOutcome::Skipped);
        }

        let mut points: Vec<(i64, f64)> = history
            .iter()
            .map(|o| (o.timestamp.and_utc().timestamp(), o.sentiment.clamp(-1.0, 1.0)))
            .collect();
        // Stable: same-second rows keep append order.
        points.sort_by_key(|p| p.0);

        if let Some(dir) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| RenderError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        self.draw(&points).map_err(|e| RenderError::Draw {
            path: self.path.clone(),
            detail: e.to_string(),
        })?;

        tracing::info!(
            target: "trend",
            path = %self.path.display(),
            points = points.len(),
            "sentiment chart saved"
        );
        Ok(RenderOutcome::Rendered(self.path.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::Observation;
    use chrono::NaiveDate;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn obs(min: u32, s: f64) -> Observation {
        Observation {
            timestamp: NaiveDate::from_ymd_opt(2025, 6, 1)
                .unwrap()
                .and_hms_opt(12, min, 0)
                .unwrap(),
            source: "BBC".into(),
            headline: "h".into(),
            sentiment: s,
        }
    }

    #[test]
    fn empty_history_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let r = PngTrendRenderer::new(dir.path().join("plots/sentiment_trend.png"), -0.5);
        assert_eq!(r.render(&[]).unwrap(), RenderOutcome::Skipped);
        assert!(!dir.path().join("plots").exists());
    }

    #[test]
    fn renders_png_and_overwrites_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plots/sentiment_trend.png");
        let r = PngTrendRenderer::new(&path, -0.5).with_size(320, 200);

        let first = r.render(&[obs(0, 0.2), obs(30, -0.4)]).unwrap();
        assert_eq!(first, RenderOutcome::Rendered(path.clone()));
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(PNG_MAGIC));

        // Out-of-order + single-instant input still renders; folder keeps one file.
        r.render(&[obs(45, 0.9), obs(10, -1.0), obs(10, 0.0)]).unwrap();
        r.render(&[obs(5, 0.1)]).unwrap();
        let files = std::fs::read_dir(dir.path().join("plots")).unwrap().count();
        assert_eq!(files, 1);
        assert!(std::fs::read(&path).unwrap().starts_with(PNG_MAGIC));
    }
}
