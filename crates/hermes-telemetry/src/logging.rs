//! Structured diagnostic logging for Hermes.
//!
//! This is the harness's own logging (stage activity, swallowed sink errors,
//! bootstrap decisions) and is independent of the interaction logger, which
//! renders HTTP exchanges through templates.
//!
//! # Example
//!
//! ```rust,ignore
//! use hermes_telemetry::logging::{LogConfig, init_logging};
//!
//! init_logging(&LogConfig::default())?;
//!
//! tracing::info!(http.method = "GET", http.url = "http://host/api/users", "Sending request");
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Log level or filter directive (e.g., "info", "hermes_middleware=debug").
    pub level: String,

    /// Whether to output JSON format.
    pub json_format: bool,

    /// Whether to include span events (enter, exit, close).
    pub span_events: bool,

    /// Whether to include file/line info.
    pub file_line_info: bool,

    /// Whether to include thread IDs.
    pub thread_ids: bool,

    /// Whether to include target (module path).
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json_format: false,
            span_events: false,
            file_line_info: false,
            thread_ids: false,
            include_target: true,
        }
    }
}

/// Initializes the logging subsystem.
///
/// Calling this more than once is a no-op: the first successful call wins,
/// and a subscriber installed by someone else (another test binary helper,
/// for instance) is left in place.
///
/// # Errors
///
/// Returns `TelemetryError::LoggingInit` if the level directive is invalid.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.level)?;
    if INSTALLED.load(Ordering::Acquire) {
        return Ok(());
    }

    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let result = if config.json_format {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_span_events(span_events)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_thread_ids(config.thread_ids)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry().with(fmt_layer).try_init()
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .compact()
            .with_test_writer()
            .with_span_events(span_events)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_thread_ids(config.thread_ids)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry().with(fmt_layer).try_init()
    };

    if let Err(e) = result {
        // A global subscriber already exists; keep it.
        tracing::debug!(error = %e, "logging already initialized");
    }
    INSTALLED.store(true, Ordering::Release);

    Ok(())
}

/// Creates an env filter from a string.
///
/// # Errors
///
/// Returns error if the filter string is invalid.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter)
        .map_err(|e| TelemetryError::LoggingInit(format!("Invalid log level: {e}")))
}
