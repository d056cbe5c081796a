use crate::implementations::DEFAULT_IMAGE_SIZE;
use crate::trim::TrimPolicy;
use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Benchmarks charted by the raw-log pipeline, in render order
pub const DEFAULT_BENCHMARKS: [&str; 13] = [
    "Copy",
    "CtorDtorEmptyMap",
    "CtorDtorSingleEntryMap",
    "InsertHugeInt",
    "IterateIntegers",
    "RandomDistinct2",
    "RandomFind_200",
    "RandomFind_2000",
    "RandomFind_500000",
    "RandomFindString",
    "RandomFindString_1000000",
    "RandomInsertErase",
    "RandomInsertEraseStrings",
];

pub const DEFAULT_HIGHLIGHT: &str = "optimap::HashMap";
pub const DEFAULT_INSERT_MARKER: &str = "Insert";

static UNSAFE_FILE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.\-]").expect("static regex"));

/// `dir/<stem>.png`, with characters outside `[A-Za-z0-9_.-]` replaced by `_`
pub fn chart_path(dir: &Path, stem: &str) -> PathBuf {
    let stem = UNSAFE_FILE_CHARS.replace_all(stem, "_");
    dir.join(format!("{}.png", stem))
}

fn env_list(key: &str) -> Option<Vec<String>> {
    env::var(key).ok().map(|raw| {
        raw.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        Err(_) => Ok(None),
    }
}

// ============================================================================
// Raw log pipeline
// ============================================================================

#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub input_path: PathBuf,
    /// Filtered copy of the input written before parsing
    pub cleaned_path: PathBuf,
    pub output_dir: PathBuf,
    pub benchmarks: Vec<String>,
    /// Substrings that mark a bar label for emphasis
    pub highlight: Vec<String>,
    pub image_size: (u32, u32),
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data/all_new.txt"),
            cleaned_path: PathBuf::from("data/all_new_cleaned.txt"),
            output_dir: PathBuf::from("analysis/plots"),
            benchmarks: DEFAULT_BENCHMARKS.iter().map(|s| s.to_string()).collect(),
            highlight: vec![DEFAULT_HIGHLIGHT.to_string()],
            image_size: DEFAULT_IMAGE_SIZE,
        }
    }
}

impl PlotConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `BENCH_PLOT_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(path) = env::var("BENCH_PLOT_INPUT") {
            config.input_path = PathBuf::from(path);
        }
        if let Ok(path) = env::var("BENCH_PLOT_CLEANED") {
            config.cleaned_path = PathBuf::from(path);
        }
        if let Ok(path) = env::var("BENCH_PLOT_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(path);
        }
        if let Some(benchmarks) = env_list("BENCH_PLOT_BENCHMARKS") {
            if benchmarks.is_empty() {
                bail!("BENCH_PLOT_BENCHMARKS is set but names no benchmarks");
            }
            config.benchmarks = benchmarks;
        }
        if let Some(needles) = env_list("BENCH_PLOT_HIGHLIGHT") {
            config.highlight = needles;
        }

        Ok(config)
    }

    pub fn with_input(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = path.into();
        self
    }

    pub fn with_cleaned(mut self, path: impl Into<PathBuf>) -> Self {
        self.cleaned_path = path.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_benchmarks<I, S>(mut self, benchmarks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.benchmarks = benchmarks.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_highlight<I, S>(mut self, needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.highlight = needles.into_iter().map(Into::into).collect();
        self
    }

    pub fn log_config(&self) {
        tracing::info!("📋 Configuration:");
        tracing::info!("   Input:        {}", self.input_path.display());
        tracing::info!("   Cleaned copy: {}", self.cleaned_path.display());
        tracing::info!("   Output dir:   {}", self.output_dir.display());
        tracing::info!("   Benchmarks:   {}", self.benchmarks.len());
        tracing::info!("   Highlight:    {:?}", self.highlight);
    }
}

// ============================================================================
// Scaling pipeline
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotMode {
    /// One line chart per benchmark family
    Families,
    /// One chart per key count for insertion benchmarks
    KeyCounts,
    Both,
}

impl PlotMode {
    pub fn includes_families(&self) -> bool {
        matches!(self, PlotMode::Families | PlotMode::Both)
    }

    pub fn includes_key_counts(&self) -> bool {
        matches!(self, PlotMode::KeyCounts | PlotMode::Both)
    }
}

impl FromStr for PlotMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "families" | "family" => Ok(PlotMode::Families),
            "key-counts" | "key_counts" | "keys" => Ok(PlotMode::KeyCounts),
            "both" | "all" => Ok(PlotMode::Both),
            other => bail!(
                "Unknown plot mode {:?} (expected 'families', 'key-counts' or 'both')",
                other
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScalingConfig {
    pub output_dir: PathBuf,
    pub mode: PlotMode,
    /// Benchmarks whose name contains this get per-key-count charts
    pub insert_marker: String,
    pub trim: TrimPolicy,
    pub highlight: Vec<String>,
    pub image_size: (u32, u32),
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("plots"),
            mode: PlotMode::Both,
            insert_marker: DEFAULT_INSERT_MARKER.to_string(),
            trim: TrimPolicy::default(),
            highlight: vec![DEFAULT_HIGHLIGHT.to_string()],
            image_size: DEFAULT_IMAGE_SIZE,
        }
    }
}

impl ScalingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(path) = env::var("BENCH_PLOT_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(path);
        }
        if let Ok(mode) = env::var("BENCH_PLOT_MODE") {
            config.mode = mode.parse().context("BENCH_PLOT_MODE")?;
        }
        if let Ok(marker) = env::var("BENCH_PLOT_INSERT_MARKER") {
            config.insert_marker = marker;
        }
        if let Some(per_side) = env_parse::<usize>("BENCH_PLOT_TRIM")? {
            config.trim.per_side = per_side;
        }
        if let Some(min_group) = env_parse::<usize>("BENCH_PLOT_MIN_GROUP")? {
            config.trim.min_group = min_group;
        }
        if let Some(needles) = env_list("BENCH_PLOT_HIGHLIGHT") {
            config.highlight = needles;
        }

        Ok(config)
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_mode(mut self, mode: PlotMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_insert_marker(mut self, marker: impl Into<String>) -> Self {
        self.insert_marker = marker.into();
        self
    }

    pub fn with_trim(mut self, trim: TrimPolicy) -> Self {
        self.trim = trim;
        self
    }

    pub fn with_highlight<I, S>(mut self, needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.highlight = needles.into_iter().map(Into::into).collect();
        self
    }

    pub fn log_config(&self) {
        tracing::info!("📋 Configuration:");
        tracing::info!("   Output dir:    {}", self.output_dir.display());
        tracing::info!("   Mode:          {:?}", self.mode);
        tracing::info!("   Insert marker: {}", self.insert_marker);
        tracing::info!(
            "   Trim:          {} per side, groups < {} excluded",
            self.trim.per_side,
            self.trim.effective_min_group()
        );
        tracing::info!("   Highlight:     {:?}", self.highlight);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plot_config() {
        let config = PlotConfig::default();
        assert_eq!(config.input_path, PathBuf::from("data/all_new.txt"));
        assert_eq!(config.cleaned_path, PathBuf::from("data/all_new_cleaned.txt"));
        assert_eq!(config.output_dir, PathBuf::from("analysis/plots"));
        assert_eq!(config.benchmarks.len(), 13);
        assert_eq!(config.benchmarks[0], "Copy");
        assert_eq!(config.benchmarks[12], "RandomInsertEraseStrings");
        assert_eq!(config.highlight, vec!["optimap::HashMap".to_string()]);
    }

    #[test]
    fn test_plot_config_builder() {
        let config = PlotConfig::new()
            .with_input("in.txt")
            .with_output_dir("out")
            .with_benchmarks(["Copy"])
            .with_highlight(Vec::<String>::new());

        assert_eq!(config.input_path, PathBuf::from("in.txt"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.benchmarks, vec!["Copy".to_string()]);
        assert!(config.highlight.is_empty());
    }

    #[test]
    fn test_default_scaling_config() {
        let config = ScalingConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("plots"));
        assert_eq!(config.mode, PlotMode::Both);
        assert_eq!(config.insert_marker, "Insert");
        assert_eq!(config.trim, TrimPolicy::default());
    }

    #[test]
    fn test_plot_mode_parse() {
        assert_eq!("families".parse::<PlotMode>().unwrap(), PlotMode::Families);
        assert_eq!(" Key-Counts ".parse::<PlotMode>().unwrap(), PlotMode::KeyCounts);
        assert_eq!("both".parse::<PlotMode>().unwrap(), PlotMode::Both);
        assert!("bars".parse::<PlotMode>().is_err());

        assert!(PlotMode::Both.includes_families());
        assert!(PlotMode::Both.includes_key_counts());
        assert!(!PlotMode::Families.includes_key_counts());
        assert!(!PlotMode::KeyCounts.includes_families());
    }

    #[test]
    fn test_chart_path_sanitizes() {
        let dir = Path::new("plots");
        assert_eq!(chart_path(dir, "RandomFind_200"), PathBuf::from("plots/RandomFind_200.png"));
        assert_eq!(
            chart_path(dir, "BM_Find<int>/x y"),
            PathBuf::from("plots/BM_Find_int__x_y.png")
        );
    }
}
