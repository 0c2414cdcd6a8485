// Entry point: analyses a heater control log, prints step-response metrics,
// saves the response chart and optionally opens the plot window.
use std::error::Error;
use std::io;
use std::path::Path;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pidlog::chart::{self, ChartModel};
use pidlog::cli::Args;
use pidlog::config::AppConfig;
use pidlog::log_data::ProcessLog;
use pidlog::metrics;
use pidlog::report::{format_metrics, write_metrics_csv};

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let cfg = AppConfig::load_or_default(&args.config);

    let log = match &args.log_path {
        Some(path) => {
            info!("reading log {path}");
            ProcessLog::from_path(path)?
        }
        None => ProcessLog::embedded()?,
    };
    info!(
        "{} samples across curves {:?}",
        log.len(),
        log.curve_ids()
    );

    let results = metrics::compute_all(&log, &cfg.setpoints, cfg.analysis.settle_criteria());
    for m in &results {
        println!("{}", format_metrics(m));
    }

    if let Some(path) = &args.summary {
        write_metrics_csv(&results, Path::new(path))?;
    }

    let model = ChartModel::build(&log, &cfg.setpoints, &cfg.chart);
    let output = args.output.as_deref().unwrap_or(&cfg.chart.output);
    chart::render(&model, Path::new(output), (cfg.chart.width, cfg.chart.height))?;

    #[cfg(feature = "gui")]
    if !args.nogui && cfg.display.window {
        pidlog::ui::show(model, results)?;
    }

    Ok(())
}
