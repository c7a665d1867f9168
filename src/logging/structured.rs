//! Structured logging setup using tracing
//!
//! Console output is always on; an optional JSON file layer with daily
//! rotation is added when a log file is configured.
//!
//! # Example
//!
//! ```no_run
//! use cloak::logging::init_logging;
//! use cloak::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging(&config).expect("Failed to initialize logging");
//! ```

use crate::config::LoggingConfig;
use crate::domain::{CloakError, Result};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Guard that must be kept alive for the duration of the program
/// to ensure logs are flushed properly
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

impl LoggingGuard {
    fn new(file_guard: Option<WorkerGuard>) -> Self {
        Self {
            _file_guard: file_guard,
        }
    }
}

/// Initialize the logging system based on configuration
///
/// # Returns
///
/// A `LoggingGuard` that must be kept alive for the duration of the
/// program
///
/// # Example
///
/// ```no_run
/// use cloak::logging::init_logging;
/// use cloak::config::LoggingConfig;
///
/// let config = LoggingConfig::default();
/// let _guard = init_logging(&config).expect("Failed to initialize logging");
/// // Keep _guard alive for the duration of the program
/// ```
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard> {
    let log_level = parse_log_level(&config.level)?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cloak={}", log_level)));

    let mut layers = Vec::new();

    // Console layer (always enabled)
    if config.json {
        let console_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_filter(env_filter.clone());
        layers.push(console_layer.boxed());
    } else {
        let console_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_filter(env_filter.clone());
        layers.push(console_layer.boxed());
    }

    // File logging layer (if configured)
    let file_guard = if let Some(ref file_path) = config.file_path {
        let directory = file_path.parent().unwrap_or_else(|| std::path::Path::new("."));
        let prefix = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("cloak.log");

        std::fs::create_dir_all(directory).map_err(|e| {
            CloakError::Configuration(format!(
                "Failed to create log directory {}: {e}",
                directory.display()
            ))
        })?;

        let file_appender = RollingFileAppender::new(Rotation::DAILY, directory, prefix);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let file_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_writer(non_blocking)
            .with_filter(env_filter);

        layers.push(file_layer.boxed());
        Some(guard)
    } else {
        None
    };

    tracing_subscriber::registry().with(layers).init();

    tracing::info!(
        level = %config.level,
        json = config.json,
        file = config.file_path.is_some(),
        "Logging initialized"
    );

    Ok(LoggingGuard::new(file_guard))
}

/// Parse log level from string
fn parse_log_level(level_str: &str) -> Result<Level> {
    match level_str.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(CloakError::Configuration(format!(
            "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
            level_str
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level_valid() {
        assert_eq!(parse_log_level("trace").unwrap(), Level::TRACE);
        assert_eq!(parse_log_level("debug").unwrap(), Level::DEBUG);
        assert_eq!(parse_log_level("info").unwrap(), Level::INFO);
        assert_eq!(parse_log_level("warn").unwrap(), Level::WARN);
        assert_eq!(parse_log_level("error").unwrap(), Level::ERROR);
    }

    #[test]
    fn test_parse_log_level_case_insensitive() {
        assert_eq!(parse_log_level("TRACE").unwrap(), Level::TRACE);
        assert_eq!(parse_log_level("Debug").unwrap(), Level::DEBUG);
        assert_eq!(parse_log_level("INFO").unwrap(), Level::INFO);
    }

    #[test]
    fn test_parse_log_level_invalid() {
        assert!(parse_log_level("invalid").is_err());
        assert!(parse_log_level("").is_err());
    }

    #[test]
    fn test_logging_guard_creation() {
        let guard = LoggingGuard::new(None);
        drop(guard);
    }
}
