mod cli;
mod error_fmt;
mod logging;
mod run;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use battmon_core::BatteryError;
use clap::Parser;
use eyre::Result;

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    let _ = color_eyre::install();

    if let Err(err) = real_main(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&err));
        } else {
            eprintln!("{}", humanize(&err));
        }
        std::process::exit(exit_code_for_error(&err));
    }
}

fn config_error(e: impl std::fmt::Display) -> eyre::Report {
    eyre::Report::new(BatteryError::Config(e.to_string()))
}

fn load_config(path: &std::path::Path) -> Result<battmon_config::Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| config_error(format!("read {}: {e}", path.display())))?;
    let cfg = battmon_config::load_toml(&text).map_err(config_error)?;
    cfg.validate().map_err(config_error)?;
    Ok(cfg)
}

fn real_main(cli: Cli) -> Result<()> {
    let cfg = load_config(&cli.config)?;

    let level = cli
        .log_level
        .clone()
        .or_else(|| cfg.logging.level.clone())
        .unwrap_or_else(|| "info".to_string());
    let _log_guard = logging::init_tracing(cli.json, &level, &cfg.logging)?;
    tracing::debug!(config = %cli.config.display(), "config loaded");

    let reader = run::build_reader(&cfg, cli.trace.as_deref())?;

    match cli.cmd {
        Commands::Read { mode, alpha } => run::run_read(reader, mode.as_deref(), alpha, cli.json),
        Commands::Watch { interval_ms, count } => {
            let interval_ms = interval_ms.unwrap_or(cfg.monitor.interval_ms).max(1);
            let shutdown = Arc::new(AtomicBool::new(false));
            let flag = shutdown.clone();
            if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
                tracing::warn!(error = %e, "failed to install Ctrl-C handler");
            }
            run::run_watch(
                reader,
                Duration::from_millis(interval_ms),
                count,
                cli.json,
                shutdown,
            )
        }
        Commands::SelfCheck => run::run_self_check(reader, cli.json),
    }
}
