//! Logging and observability
//!
//! Structured logging with configurable log levels, optional JSON
//! console output, and local file logging with daily rotation.
//!
//! # Example
//!
//! ```no_run
//! use cloak::logging::init_logging;
//! use cloak::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging(&config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! tracing::error!(error = "Something went wrong", "Error occurred");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the start of a processing run
///
/// # Example
///
/// ```no_run
/// use cloak::log_run_start;
///
/// log_run_start!("anonymize", 1000);
/// ```
#[macro_export]
macro_rules! log_run_start {
    ($decision:expr, $records:expr) => {
        tracing::info!(
            decision = %$decision,
            records = $records,
            "Starting processing run"
        );
    };
}

/// Log the completion of a processing run
///
/// # Example
///
/// ```no_run
/// use cloak::log_run_complete;
/// use std::time::Duration;
///
/// let count = 42;
/// let duration = Duration::from_secs(10);
/// log_run_complete!(count, duration);
/// ```
#[macro_export]
macro_rules! log_run_complete {
    ($count:expr, $duration:expr) => {
        tracing::info!(
            count = $count,
            duration_ms = $duration.as_millis(),
            "Processing run completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use cloak::log_error_with_context;
/// use cloak::domain::CloakError;
///
/// let error = CloakError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_macros_expand() {
        // Events are dropped without a subscriber; this checks expansion
        crate::log_run_start!("anonymize", 10);
        crate::log_run_complete!(10, std::time::Duration::from_millis(5));
        let error = crate::domain::CloakError::Configuration("bad value".to_string());
        crate::log_error_with_context!(&error, "loading configuration");
    }
}
