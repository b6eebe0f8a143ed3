use crate::config::LoggingConfig;
use crate::error::LoggingError;
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes console logging on stderr and, when a log directory is
/// configured, a daily-rolling JSON file.
///
/// stdout is left for the startup line. The returned guard flushes the file
/// writer on drop and must be held until the process exits.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>, LoggingError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let file_appender = file_appender(dir)?;
            let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer().json().with_writer(non_blocking_writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let console_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    Ok(guard)
}

fn file_appender(dir: &Path) -> Result<RollingFileAppender, LoggingError> {
    fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    Ok(RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("bench.log")
        .build(dir)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncreatable_log_dir_is_an_error() {
        // A regular file cannot hold a subdirectory
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = LoggingConfig {
            log_dir: Some(file.path().join("logs")),
            ..Default::default()
        };

        let err = init_logging(&config).unwrap_err();
        assert!(matches!(err, LoggingError::CreateDir { .. }));
    }

    #[test]
    fn appender_opens_in_fresh_directory() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("nested").join("logs");

        file_appender(&logs).unwrap();
        assert!(logs.is_dir());
    }
}
