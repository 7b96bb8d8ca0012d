use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::infra::{config::LogConfig, error::AppError};

/// Keeps the background log writer alive; logs are flushed when dropped.
#[derive(Debug)]
pub struct LoggingGuard {
    _worker: WorkerGuard,
}

/// Installs the global subscriber writing to `<log_dir>/<file_name>`.
///
/// The terminal belongs to the TUI, so nothing is written to stdout.
pub fn init(config: &LogConfig, log_dir: &Path, file_name: &str) -> Result<LoggingGuard, AppError> {
    let appender = tracing_appender::rolling::never(log_dir, file_name);
    let (writer, worker) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level)),
        )
        .with_target(true)
        .with_ansi(false)
        .with_writer(writer)
        .try_init()
        .map_err(AppError::LoggingInit)?;

    Ok(LoggingGuard { _worker: worker })
}
