use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Controller log to analyse (`;`-separated). Uses the built-in capture when omitted.
    #[arg(value_name = "LOG_PATH")]
    pub log_path: Option<String>,

    /// Path to config TOML
    #[arg(long, default_value = "pidlog.toml")]
    pub config: String,

    /// Chart output path, `.png` or `.svg` (overrides config)
    #[arg(long, short)]
    pub output: Option<String>,

    /// Also write per-curve metrics to this CSV file
    #[arg(long)]
    pub summary: Option<String>,

    /// Do not open the plot window
    #[arg(long, default_value_t = false)]
    pub nogui: bool,

    /// Debug logging
    #[arg(long, short, default_value_t = false)]
    pub verbose: bool,
}
