/// Scaling charts from structured benchmark CSV files
///
/// Usage: plot-scaling <results.csv>...
///
/// Every file needs `name` (`"<benchmark>/<key_count>"`) and `cpu_time`
/// columns, and all files must share one header. Charts go to `plots/`.
use bench_plots::config::ScalingConfig;
use bench_plots::implementations::PngRenderer;
use bench_plots::scaling;
use bench_plots::traits::ChartRenderer;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_target(false).init();

    let inputs: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();

    let config = ScalingConfig::from_env()?;
    config.log_config();
    tracing::info!("   Inputs:        {}", inputs.len());

    let mut renderer = PngRenderer::new(config.image_size);
    let summary = scaling::run(&inputs, &config, &mut renderer)?;
    summary.log(renderer.name());

    Ok(())
}
