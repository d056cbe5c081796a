/// Scaling pipeline: trimmed mean CPU time per library across key counts
///
/// Samples are grouped per `(library, name)`, trimmed, and averaged per
/// `(library, benchmark_name, key_count)`. Two chart families come out of it:
/// one line chart per benchmark (a series per library), and for insertion
/// benchmarks one bar chart per key count.
use crate::aggregate::mean_by;
use crate::chart::{Bar, BarChart, BarPalette, Chart, LineChart, Series};
use crate::config::{chart_path, ScalingConfig};
use crate::highlight::Highlight;
use crate::sample::{BenchmarkSample, SampleTable};
use crate::traits::{ChartRenderer, RenderSummary};
use crate::trim::{trim_groups, TrimPolicy};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const Y_DESC: &str = "Mean CPU time (lower is better)";

#[derive(Debug, Clone, PartialEq)]
pub struct ScalingPoint {
    pub library: String,
    pub benchmark_name: String,
    pub key_count: u64,
    pub mean_cpu_time: f64,
    /// Samples left after trimming
    pub samples: usize,
}

/// Trim every sample group and average the survivors.
///
/// Output is ordered by benchmark name, then library, then key count.
pub fn aggregate_samples(samples: &[BenchmarkSample], policy: &TrimPolicy) -> Vec<ScalingPoint> {
    let groups = trim_groups(
        samples,
        |s| {
            (
                s.library.clone(),
                s.name.clone(),
                s.benchmark_name.clone(),
                s.key_count,
            )
        },
        |s| s.cpu_time,
        policy,
    );

    let mut retained = Vec::new();
    for group in groups {
        let (library, name, benchmark_name, key_count) = group.key;
        if group.retained.is_empty() {
            warn!(
                "Excluding {} [{}]: {} samples, need at least {} to trim",
                name,
                library,
                group.original_len,
                policy.effective_min_group()
            );
            continue;
        }
        for value in group.retained {
            retained.push((library.clone(), benchmark_name.clone(), key_count, value));
        }
    }

    let mut points: Vec<ScalingPoint> = mean_by(
        retained,
        |(library, bench, keys, _)| (library.clone(), bench.clone(), *keys),
        |(_, _, _, value)| Some(*value),
    )
    .into_iter()
    .map(|row| {
        let (library, benchmark_name, key_count) = row.key;
        ScalingPoint {
            library,
            benchmark_name,
            key_count,
            mean_cpu_time: row.mean,
            samples: row.count,
        }
    })
    .collect();

    points.sort_by(|a, b| {
        (&a.benchmark_name, &a.library, a.key_count).cmp(&(&b.benchmark_name, &b.library, b.key_count))
    });
    points
}

/// One line chart per benchmark family, keyed by benchmark name
pub fn family_charts(points: &[ScalingPoint], highlight: &Highlight) -> BTreeMap<String, LineChart> {
    let mut families: BTreeMap<&str, BTreeMap<&str, Vec<(u64, f64)>>> = BTreeMap::new();
    for p in points {
        families
            .entry(&p.benchmark_name)
            .or_default()
            .entry(&p.library)
            .or_default()
            .push((p.key_count, p.mean_cpu_time));
    }

    families
        .into_iter()
        .map(|(bench, libraries)| {
            let series = libraries
                .into_iter()
                .map(|(library, mut points)| {
                    points.sort_by_key(|&(k, _)| k);
                    Series {
                        label: library.to_string(),
                        points,
                        emphasized: highlight.matches(library),
                    }
                })
                .collect();

            let chart = LineChart {
                title: format!("{}: mean CPU time by key count", bench),
                x_desc: "Key count".to_string(),
                y_desc: Y_DESC.to_string(),
                series,
            };
            (bench.to_string(), chart)
        })
        .collect()
}

/// One bar chart per key count over the insertion benchmarks
pub fn insert_charts(
    points: &[ScalingPoint],
    marker: &str,
    highlight: &Highlight,
) -> BTreeMap<u64, BarChart> {
    let mut by_keys: BTreeMap<u64, Vec<&ScalingPoint>> = BTreeMap::new();
    for p in points.iter().filter(|p| p.benchmark_name.contains(marker)) {
        by_keys.entry(p.key_count).or_default().push(p);
    }

    by_keys
        .into_iter()
        .map(|(keys, points)| {
            let bars = points
                .into_iter()
                .map(|p| {
                    let label = format!("{} ({})", p.benchmark_name, p.library);
                    Bar {
                        emphasized: highlight.matches(&label),
                        label,
                        value: p.mean_cpu_time,
                    }
                })
                .collect();

            let chart = BarChart {
                title: format!("Insertion benchmarks with {} keys", keys),
                x_desc: Y_DESC.to_string(),
                y_desc: "Benchmark (library)".to_string(),
                bars,
                palette: BarPalette::Viridis,
            };
            (keys, chart)
        })
        .collect()
}

fn render_one<R: ChartRenderer>(renderer: &mut R, chart: Chart, path: PathBuf) -> Result<PathBuf> {
    renderer
        .render(&chart, &path)
        .with_context(|| format!("Failed to render {}", path.display()))?;
    info!("Saved plot to {}", path.display());
    Ok(path)
}

fn render_families<R: ChartRenderer>(
    points: &[ScalingPoint],
    highlight: &Highlight,
    output_dir: &Path,
    renderer: &mut R,
) -> Result<RenderSummary> {
    let mut summary = RenderSummary::default();
    for (bench, chart) in family_charts(points, highlight) {
        info!("Generating plot for {}...", bench);
        let path = chart_path(output_dir, &bench);
        summary.written.push(render_one(renderer, Chart::Line(chart), path)?);
    }
    Ok(summary)
}

fn render_key_counts<R: ChartRenderer>(
    points: &[ScalingPoint],
    marker: &str,
    highlight: &Highlight,
    output_dir: &Path,
    renderer: &mut R,
) -> Result<RenderSummary> {
    let mut summary = RenderSummary::default();
    let charts = insert_charts(points, marker, highlight);
    if charts.is_empty() {
        info!("No benchmarks matching {:?} found", marker);
        summary.skipped.push(marker.to_string());
    }
    for (keys, chart) in charts {
        info!("Generating insertion plot for {} keys...", keys);
        let path = chart_path(output_dir, &format!("insert_keys_{}", keys));
        summary.written.push(render_one(renderer, Chart::Bar(chart), path)?);
    }
    Ok(summary)
}

/// Render the charts selected by `config.mode` from an already loaded table
pub fn render_table<R: ChartRenderer>(
    table: &SampleTable,
    config: &ScalingConfig,
    output_dir: &Path,
    renderer: &mut R,
) -> Result<RenderSummary> {
    let mut summary = RenderSummary::default();
    let highlight = Highlight::new(&config.highlight)?;
    let points = aggregate_samples(&table.samples, &config.trim);

    if points.is_empty() {
        warn!("No benchmark group survived trimming, nothing to plot");
        return Ok(summary);
    }

    if config.mode.includes_families() {
        summary.merge(render_families(&points, &highlight, output_dir, renderer)?);
    }
    if config.mode.includes_key_counts() {
        summary.merge(render_key_counts(
            &points,
            &config.insert_marker,
            &highlight,
            output_dir,
            renderer,
        )?);
    }

    Ok(summary)
}

/// Run the whole scaling pipeline over `paths`. Any unreadable or malformed
/// file fails the run.
pub fn run<R, P>(paths: &[P], config: &ScalingConfig, renderer: &mut R) -> Result<RenderSummary>
where
    R: ChartRenderer,
    P: AsRef<Path>,
{
    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("Failed to create output directory: {}", config.output_dir.display())
    })?;

    let table = SampleTable::from_paths(paths)?;
    if table.is_empty() {
        warn!("No samples loaded from {} input files", paths.len());
        return Ok(RenderSummary::default());
    }
    info!("Loaded {} samples in total", table.len());

    render_table(&table, config, &config.output_dir, renderer)
}
