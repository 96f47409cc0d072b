//! Trace output.
//!
//! The terminal belongs to the TUI, so traces go to a daily-rolling file
//! under `<root>/logs/`.

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, LOG_VAR};

/// Installs the global subscriber.
///
/// `LOGBOOK_LOG` wins over the configured filter. The returned guard
/// flushes buffered output on drop and must live until exit.
pub fn init(root: &Path, config: &Config) -> Result<WorkerGuard, String> {
    let log_dir = root.join("logs");
    fs::create_dir_all(&log_dir)
        .map_err(|e| format!("failed to create {}: {e}", log_dir.display()))?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "logbook.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_env(LOG_VAR)
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .map_err(|e| format!("invalid log filter: {e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(non_blocking)
        .try_init()
        .map_err(|e| format!("failed to install trace subscriber: {e}"))?;

    Ok(guard)
}
