pub mod chart;
pub mod cli;
pub mod config;
pub mod log_data;
pub mod metrics;
pub mod report;
#[cfg(feature = "gui")]
pub mod ui;
