//! Tracing subscriber setup: console (pretty or JSON) plus an optional JSON file sink.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber. `RUST_LOG` wins over `level`.
///
/// Console output goes to stderr so stdout carries only readings. The returned
/// guard flushes the file sink when dropped and must outlive all logging.
pub fn init_tracing(
    json: bool,
    level: &str,
    logging: &battmon_config::Logging,
) -> eyre::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| eyre::eyre!("invalid log level {level:?}: {e}"))?;

    let (pretty, json_layer) = if json {
        let layer = fmt::layer()
            .json()
            .with_current_span(false)
            .with_writer(std::io::stderr);
        (None, Some(layer))
    } else {
        let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
        (Some(layer), None)
    };

    let mut guard = None;
    let file_layer = match logging.file.as_deref() {
        Some(path) => {
            let path = Path::new(path);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| eyre::eyre!("logging.file {path:?} has no file name"))?;
            let appender = match logging.rotation.as_deref().unwrap_or("never") {
                "daily" => tracing_appender::rolling::daily(dir, name),
                "hourly" => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let (writer, g) = tracing_appender::non_blocking(appender);
            guard = Some(g);
            Some(fmt::layer().json().with_ansi(false).with_writer(writer))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| eyre::eyre!("install tracing subscriber: {e}"))?;
    Ok(guard)
}
