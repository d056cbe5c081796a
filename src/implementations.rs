use crate::chart::{render_png, Chart};
use crate::traits::ChartRenderer;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_IMAGE_SIZE: (u32, u32) = (1200, 800);

/// Renders charts to PNG files with plotters
pub struct PngRenderer {
    size: (u32, u32),
}

impl PngRenderer {
    pub fn new(size: (u32, u32)) -> Self {
        Self { size }
    }
}

impl Default for PngRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_SIZE)
    }
}

impl ChartRenderer for PngRenderer {
    fn render(&mut self, chart: &Chart, path: &Path) -> Result<()> {
        debug!("Rendering {:?} to {}", chart.title(), path.display());
        render_png(chart, path, self.size)
    }

    fn name(&self) -> &str {
        "png"
    }
}

/// Keeps chart descriptions in memory instead of writing files
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub charts: Vec<(PathBuf, Chart)>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> Vec<&Path> {
        self.charts.iter().map(|(p, _)| p.as_path()).collect()
    }

    /// Look up a recorded chart by file name (e.g. `"Copy_performance.png"`)
    pub fn chart(&self, file_name: &str) -> Option<&Chart> {
        self.charts
            .iter()
            .find(|(p, _)| p.file_name().and_then(|n| n.to_str()) == Some(file_name))
            .map(|(_, c)| c)
    }
}

impl ChartRenderer for RecordingRenderer {
    fn render(&mut self, chart: &Chart, path: &Path) -> Result<()> {
        self.charts.push((path.to_path_buf(), chart.clone()));
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}
