/// Raw-log pipeline: filter, parse, aggregate per map, render ranked bar charts
///
/// For every benchmark in the allow-list two charts are produced,
/// `<benchmark>_performance.png` (mean ns/op) and `<benchmark>_memory.png`
/// (mean MB), each ranked ascending by the mean.
use crate::aggregate::{mean_by, rank_ascending, MeanRow};
use crate::chart::{Bar, BarChart, BarPalette, Chart};
use crate::config::{chart_path, PlotConfig};
use crate::highlight::Highlight;
use crate::line_filter::{clean_file, LineFilter};
use crate::measurement::{parse_measurements, MeasurementRow, ParsedMeasurements};
use crate::traits::{ChartRenderer, RenderSummary};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

const Y_DESC: &str = "Map Type and Hash Function";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Performance,
    Memory,
}

impl Metric {
    pub fn file_suffix(&self) -> &'static str {
        match self {
            Metric::Performance => "performance",
            Metric::Memory => "memory",
        }
    }

    fn value(&self, row: &MeasurementRow) -> Option<f64> {
        match self {
            Metric::Performance => row.ns_per_op,
            Metric::Memory => row.memory_mb,
        }
    }

    fn title(&self, benchmark: &str) -> String {
        match self {
            Metric::Performance => format!("Performance Comparison for {}", benchmark),
            Metric::Memory => format!("Memory Usage for {}", benchmark),
        }
    }

    fn x_desc(&self) -> &'static str {
        match self {
            Metric::Performance => "Mean Nanoseconds per Operation (lower is better)",
            Metric::Memory => "Mean Memory Usage (MB)",
        }
    }

    fn palette(&self) -> BarPalette {
        match self {
            Metric::Performance => BarPalette::Viridis,
            Metric::Memory => BarPalette::Plasma,
        }
    }
}

/// Mean of `metric` per `map_with_hash`, ranked ascending
pub fn ranked_means<'a>(
    rows: impl IntoIterator<Item = &'a MeasurementRow>,
    metric: Metric,
) -> Vec<MeanRow<String>> {
    let mut means = mean_by(rows, |row| row.map_with_hash.clone(), |row| metric.value(row));
    rank_ascending(&mut means);
    means
}

/// Build the ranked bar chart for one benchmark and metric, or `None` when no
/// row has a value for the metric
pub fn build_chart(
    parsed: &ParsedMeasurements,
    benchmark: &str,
    metric: Metric,
    highlight: &Highlight,
) -> Option<BarChart> {
    let means = ranked_means(parsed.for_benchmark(benchmark), metric);
    if means.is_empty() {
        return None;
    }

    let bars = means
        .into_iter()
        .map(|row| Bar {
            emphasized: highlight.matches(&row.key),
            label: row.key,
            value: row.mean,
        })
        .collect();

    Some(BarChart {
        title: metric.title(benchmark),
        x_desc: metric.x_desc().to_string(),
        y_desc: Y_DESC.to_string(),
        bars,
        palette: metric.palette(),
    })
}

/// Render both charts for every allow-listed benchmark present in the data
pub fn render_benchmarks<R: ChartRenderer>(
    parsed: &ParsedMeasurements,
    benchmarks: &[String],
    highlight: &Highlight,
    output_dir: &Path,
    renderer: &mut R,
) -> Result<RenderSummary> {
    let mut summary = RenderSummary::default();

    for bench in benchmarks {
        info!("Generating plot for {}...", bench);

        if parsed.for_benchmark(bench).next().is_none() {
            info!("No data found for benchmark: {}", bench);
            summary.skipped.push(bench.clone());
            continue;
        }

        for metric in [Metric::Performance, Metric::Memory] {
            let Some(chart) = build_chart(parsed, bench, metric, highlight) else {
                warn!(
                    "No {} values for benchmark {}, skipping chart",
                    metric.file_suffix(),
                    bench
                );
                continue;
            };

            let path = chart_path(output_dir, &format!("{}_{}", bench, metric.file_suffix()));
            renderer
                .render(&Chart::Bar(chart), &path)
                .with_context(|| format!("Failed to render {}", path.display()))?;
            info!("Saved plot to {}", path.display());
            summary.written.push(path);
        }
    }

    Ok(summary)
}

/// Run the whole raw-log pipeline.
///
/// A missing or unreadable input file is logged and ends the run early with an
/// empty summary; rendering failures propagate.
pub fn run<R: ChartRenderer>(config: &PlotConfig, renderer: &mut R) -> Result<RenderSummary> {
    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("Failed to create output directory: {}", config.output_dir.display())
    })?;

    let filter = LineFilter::new()?;
    let cleaned = match clean_file(&config.input_path, &config.cleaned_path, &filter) {
        Ok(text) => text,
        Err(e) => {
            error!("Error reading the data file: {:#}", e);
            return Ok(RenderSummary::default());
        }
    };

    let parsed = parse_measurements(&cleaned);
    info!("Parsed {} measurement rows", parsed.rows.len());
    if parsed.dropped > 0 {
        warn!("Dropped {} malformed records", parsed.dropped);
    }

    let highlight = Highlight::new(&config.highlight)?;
    render_benchmarks(&parsed, &config.benchmarks, &highlight, &config.output_dir, renderer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::implementations::RecordingRenderer;

    const LOG: &str = "\
optimap::HashMap;wyhash;Copy;1;copy;1000;4.0;10.0
optimap::HashMap;wyhash;Copy;2;copy;1000;6.0;10.0
std::unordered_map;std::hash;Copy;1;copy;1000;9.0;5.0
absl::flat_hash_map;absl::Hash;Copy;1;copy;1000;2.0;N/A
tsl::robin_map;std::hash;RandomFind_200;1;find;200;N/A;N/A
";

    #[test]
    fn test_ranked_means() {
        let parsed = parse_measurements(LOG);
        let means = ranked_means(parsed.for_benchmark("Copy"), Metric::Performance);

        let ranked: Vec<(&str, f64)> = means.iter().map(|r| (r.key.as_str(), r.mean)).collect();
        assert_eq!(
            ranked,
            vec![
                ("absl::flat_hash_map (absl::Hash)", 2.0),
                ("optimap::HashMap (wyhash)", 5.0),
                ("std::unordered_map (std::hash)", 9.0),
            ]
        );
    }

    #[test]
    fn test_memory_skips_null_groups() {
        let parsed = parse_measurements(LOG);
        let means = ranked_means(parsed.for_benchmark("Copy"), Metric::Memory);

        let keys: Vec<&str> = means.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["std::unordered_map (std::hash)", "optimap::HashMap (wyhash)"]);
    }

    #[test]
    fn test_build_chart_emphasizes_highlight() {
        let parsed = parse_measurements(LOG);
        let highlight = Highlight::new(["optimap::HashMap"]).unwrap();

        let chart = build_chart(&parsed, "Copy", Metric::Performance, &highlight).unwrap();

        assert_eq!(chart.title, "Performance Comparison for Copy");
        assert_eq!(chart.palette, BarPalette::Viridis);
        let emphasized: Vec<&str> = chart
            .bars
            .iter()
            .filter(|b| b.emphasized)
            .map(|b| b.label.as_str())
            .collect();
        assert_eq!(emphasized, vec!["optimap::HashMap (wyhash)"]);
    }

    #[test]
    fn test_all_null_metric_builds_no_chart() {
        let parsed = parse_measurements(LOG);
        assert!(build_chart(&parsed, "RandomFind_200", Metric::Performance, &Highlight::none()).is_none());
    }

    #[test]
    fn test_render_benchmarks_skips_missing() {
        let parsed = parse_measurements(LOG);
        let benchmarks = vec![
            "Copy".to_string(),
            "IterateIntegers".to_string(),
            "RandomFind_200".to_string(),
        ];
        let mut renderer = RecordingRenderer::new();

        let summary = render_benchmarks(
            &parsed,
            &benchmarks,
            &Highlight::none(),
            Path::new("out"),
            &mut renderer,
        )
        .unwrap();

        assert_eq!(summary.skipped, vec!["IterateIntegers".to_string()]);
        assert_eq!(
            renderer.paths(),
            vec![Path::new("out/Copy_performance.png"), Path::new("out/Copy_memory.png")]
        );
        assert_eq!(summary.written.len(), 2);
    }
}
