//! File-based tracing setup.
//!
//! The terminal belongs to the UI, so log output goes to `loanbook.log`
//! through a non-blocking appender.

use super::config::AppConfig;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "loanbook.log";

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("could not create log directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install log subscriber: {0}")]
    Install(String),
}

/// Installs the global subscriber. Keep the returned guard alive for the
/// life of the process or buffered lines are lost on exit.
///
/// # Errors
///
/// [`LoggingError::CreateDir`] if the log directory cannot be created,
/// [`LoggingError::Install`] if a subscriber is already installed.
pub fn init_logging(config: &AppConfig) -> Result<WorkerGuard, LoggingError> {
    std::fs::create_dir_all(&config.log_dir).map_err(|source| LoggingError::CreateDir {
        path: config.log_dir.clone(),
        source,
    })?;

    let appender = tracing_appender::rolling::never(&config.log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))?;

    Ok(guard)
}
