// Data preparation
pub mod aggregate;
pub mod line_filter;
pub mod measurement;
pub mod sample;
pub mod trim;

// Charting
pub mod chart;
pub mod highlight;

// Pipelines and their pluggable renderers
pub mod config;
pub mod implementations;
pub mod raw_log;
pub mod scaling;
pub mod traits;
