/// Ranked bar charts from the semicolon-delimited hash-map benchmark log
///
/// Reads `data/all_new.txt`, writes `data/all_new_cleaned.txt`, and renders
/// `<benchmark>_performance.png` / `<benchmark>_memory.png` into
/// `analysis/plots`. Paths can be overridden with `BENCH_PLOT_*` variables.
use bench_plots::config::PlotConfig;
use bench_plots::implementations::PngRenderer;
use bench_plots::raw_log;
use bench_plots::traits::ChartRenderer;

fn main() -> anyhow::Result<()> {
    // Load .env file if present (fails silently if not found)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_target(false).init();

    let config = PlotConfig::from_env()?;
    config.log_config();

    let mut renderer = PngRenderer::new(config.image_size);
    let summary = raw_log::run(&config, &mut renderer)?;
    summary.log(renderer.name());

    Ok(())
}
