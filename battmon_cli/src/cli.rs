//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "battmon", version, about = "Battery voltage monitor")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/battmon.toml")]
    pub config: PathBuf,

    /// Replay raw ADC codes from a CSV (strict header `raw`) instead of the live backend
    #[arg(long, value_name = "CSV")]
    pub trace: Option<PathBuf>,

    /// Print snapshots, logs and errors as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); defaults to [logging] level, then info
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Take one reading and print every metric
    Read {
        /// Override the filter: average, median or exponential
        #[arg(long, value_name = "MODE")]
        mode: Option<String>,
        /// Override the EMA smoothing factor (clamped to 0.01..=1.0)
        #[arg(long, value_name = "ALPHA")]
        alpha: Option<f32>,
    },
    /// Poll the battery periodically until Ctrl-C
    Watch {
        /// Delay between readings (defaults to [monitor] interval_ms)
        #[arg(long, value_name = "MS")]
        interval_ms: Option<u64>,
        /// Stop after this many readings
        #[arg(long, value_name = "N")]
        count: Option<u64>,
    },
    /// Initialize the ADC and take one reading
    SelfCheck,
}
