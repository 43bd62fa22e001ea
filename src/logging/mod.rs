//! Logging and observability
//!
//! Structured logging through `tracing`, with:
//! - Configurable log levels (`RUST_LOG` wins when set)
//! - Human-readable console output on stderr
//! - Optional JSON file logging with daily or hourly rotation
//!
//! # Example
//!
//! ```no_run
//! use qsvault::logging::init_logging;
//! use qsvault::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(account_id = "123456789012", "Backup started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use qsvault::log_retry_attempt;
///
/// log_retry_attempt!("Sales", 2, 10, 20u64);
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($name:expr, $attempt:expr, $max_attempts:expr, $delay_secs:expr) => {
        tracing::warn!(
            dashboard = %$name,
            attempt = $attempt,
            max_attempts = $max_attempts,
            delay_secs = $delay_secs,
            "Export job limit reached, retrying"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use qsvault::log_error_with_context;
/// use qsvault::domain::VaultError;
///
/// let error = VaultError::Configuration("Invalid config".to_string());
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
