/// Rendering seam for the plotting pipelines
///
/// Pipelines describe charts; a `ChartRenderer` turns each description into
/// an output file. Swap implementations to render PNGs, or to capture chart
/// descriptions in memory for tests and dry runs.
use crate::chart::Chart;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub trait ChartRenderer {
    /// Write `chart` to `path`
    fn render(&mut self, chart: &Chart, path: &Path) -> Result<()>;

    /// Get the name/identifier of this renderer (for reporting)
    fn name(&self) -> &str;
}

/// Outcome of one pipeline run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderSummary {
    /// Files written, in render order
    pub written: Vec<PathBuf>,
    /// Charts (benchmark names or chart stems) skipped for lack of data
    pub skipped: Vec<String>,
}

impl RenderSummary {
    pub fn merge(&mut self, other: RenderSummary) {
        self.written.extend(other.written);
        self.skipped.extend(other.skipped);
    }

    pub fn log(&self, renderer: &str) {
        tracing::info!("📊 Render summary ({})", renderer);
        tracing::info!("   Charts written: {}", self.written.len());
        if !self.skipped.is_empty() {
            tracing::info!("   Skipped:        {}", self.skipped.join(", "));
        }
    }
}
