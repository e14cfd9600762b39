//! Logging setup for applications embedding envoi
//!
//! The mediator only emits `tracing` events; nothing is printed unless the
//! application installs a subscriber. This module installs one for the
//! common cases.

use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Environment variable selecting the logging mode
pub const LOG_MODE_ENV: &str = "ENVOI_LOG_MODE";

/// Environment variable overriding the filter directives
pub const LOG_LEVEL_ENV: &str = "ENVOI_LOG_LEVEL";

/// Logging mode for different use cases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingMode {
    /// No subscriber is installed
    Silent,
    /// Compact stderr output at `info`
    Development,
    /// Verbose output with thread ids and source locations at `debug`
    Debug,
}

impl LoggingMode {
    /// Parse the value of `ENVOI_LOG_MODE`
    pub fn parse(value: &str) -> Result<Self, LoggingError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "silent" => Ok(LoggingMode::Silent),
            "development" | "dev" => Ok(LoggingMode::Development),
            "debug" => Ok(LoggingMode::Debug),
            other => Err(LoggingError::InvalidEnv(format!(
                "{LOG_MODE_ENV}={other} (expected silent, development or debug)"
            ))),
        }
    }
}

/// Logging configuration error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),

    #[error("Invalid environment variable: {0}")]
    InvalidEnv(String),
}

/// Initialize logging with the specified mode
///
/// Call this once, before creating mediators whose activity should be
/// logged. Installing a second global subscriber fails with
/// [`LoggingError::TracingInit`].
///
/// # Examples
///
/// ```rust,no_run
/// use envoi::logging::{init_logging, LoggingMode};
///
/// init_logging(LoggingMode::Development)?;
/// # Ok::<(), envoi::logging::LoggingError>(())
/// ```
///
/// # Environment Variables
///
/// - `ENVOI_LOG_LEVEL`: Filter directives, e.g. `debug` or `mediator=trace`
/// - `RUST_LOG`: Used when `ENVOI_LOG_LEVEL` is unset
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    match mode {
        LoggingMode::Silent => Ok(()),
        LoggingMode::Development => {
            let filter = create_env_filter("info")?;

            Registry::default()
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_file(false)
                        .with_line_number(false)
                        .compact(),
                )
                .with(filter)
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
        LoggingMode::Debug => {
            let filter = create_env_filter("debug")?;

            Registry::default()
                .with(
                    fmt::layer()
                        .pretty()
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .with(filter)
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
    }
}

/// Initialize logging from `ENVOI_LOG_MODE`
///
/// Unset means [`LoggingMode::Silent`]. Unknown values are rejected with
/// [`LoggingError::InvalidEnv`].
pub fn init_logging_from_env() -> Result<(), LoggingError> {
    let mode = match std::env::var(LOG_MODE_ENV) {
        Ok(value) => LoggingMode::parse(&value)?,
        Err(_) => LoggingMode::Silent,
    };

    init_logging(mode)
}

// ENVOI_LOG_LEVEL, then RUST_LOG, then the mode's default level
fn create_env_filter(default_level: &str) -> Result<EnvFilter, LoggingError> {
    let (source, directives) = match std::env::var(LOG_LEVEL_ENV) {
        Ok(level) => (LOG_LEVEL_ENV, level),
        Err(_) => match std::env::var("RUST_LOG") {
            Ok(rust_log) => ("RUST_LOG", rust_log),
            Err(_) => return Ok(EnvFilter::new(default_level)),
        },
    };

    EnvFilter::try_new(&directives)
        .map_err(|e| LoggingError::InvalidEnv(format!("{source}={directives}: {e}")))
}

/// Whether a global subscriber has been installed
pub fn is_initialized() -> bool {
    tracing::dispatcher::has_been_set()
}

/// Explicit form of `init_logging(LoggingMode::Silent)`
pub fn init_silent() -> Result<(), LoggingError> {
    init_logging(LoggingMode::Silent)
}
