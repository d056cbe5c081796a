/// Test configuration loading from the environment
///
/// Kept to a single test so no other test in this binary races on the
/// process environment.
use bench_plots::config::{PlotConfig, PlotMode, ScalingConfig};
use std::env;
use std::path::PathBuf;

const KEYS: [&str; 9] = [
    "BENCH_PLOT_INPUT",
    "BENCH_PLOT_CLEANED",
    "BENCH_PLOT_OUTPUT_DIR",
    "BENCH_PLOT_BENCHMARKS",
    "BENCH_PLOT_HIGHLIGHT",
    "BENCH_PLOT_MODE",
    "BENCH_PLOT_INSERT_MARKER",
    "BENCH_PLOT_TRIM",
    "BENCH_PLOT_MIN_GROUP",
];

fn clear_env() {
    for key in KEYS {
        env::remove_var(key);
    }
}

#[test]
fn test_env_overrides() {
    clear_env();

    let config = PlotConfig::from_env().unwrap();
    assert_eq!(config.input_path, PathBuf::from("data/all_new.txt"));
    assert_eq!(config.benchmarks.len(), 13);

    env::set_var("BENCH_PLOT_INPUT", "bench/raw.txt");
    env::set_var("BENCH_PLOT_OUTPUT_DIR", "out");
    env::set_var("BENCH_PLOT_BENCHMARKS", "Copy, RandomFind_200 ,,");
    env::set_var("BENCH_PLOT_HIGHLIGHT", "absl,optimap");

    let config = PlotConfig::from_env().unwrap();
    println!("Raw-log configuration: {:?}", config);
    assert_eq!(config.input_path, PathBuf::from("bench/raw.txt"));
    assert_eq!(config.cleaned_path, PathBuf::from("data/all_new_cleaned.txt"));
    assert_eq!(config.output_dir, PathBuf::from("out"));
    assert_eq!(config.benchmarks, vec!["Copy", "RandomFind_200"]);
    assert_eq!(config.highlight, vec!["absl", "optimap"]);

    env::set_var("BENCH_PLOT_BENCHMARKS", " , ");
    assert!(PlotConfig::from_env().is_err());

    env::set_var("BENCH_PLOT_MODE", "families");
    env::set_var("BENCH_PLOT_INSERT_MARKER", "Emplace");
    env::set_var("BENCH_PLOT_TRIM", "1");
    env::set_var("BENCH_PLOT_MIN_GROUP", "4");

    let config = ScalingConfig::from_env().unwrap();
    println!("Scaling configuration: {:?}", config);
    assert_eq!(config.output_dir, PathBuf::from("out"));
    assert_eq!(config.mode, PlotMode::Families);
    assert_eq!(config.insert_marker, "Emplace");
    assert_eq!(config.trim.per_side, 1);
    assert_eq!(config.trim.min_group, 4);

    env::set_var("BENCH_PLOT_MODE", "pie");
    assert!(ScalingConfig::from_env().is_err());
    env::set_var("BENCH_PLOT_MODE", "both");
    env::set_var("BENCH_PLOT_TRIM", "two");
    assert!(ScalingConfig::from_env().is_err());

    clear_env();
}
