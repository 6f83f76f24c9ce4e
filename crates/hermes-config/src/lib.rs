//! Typed configuration for Hermes.
//!
//! This crate provides the strongly-typed harness configuration with
//! support for:
//! - TOML and JSON configuration files
//! - `.env` files and environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → `.env` → env)
//!
//! # Example
//!
//! ```no_run
//! use hermes_config::ConfigLoader;
//!
//! # fn main() -> Result<(), hermes_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("hermes.toml")?
//!     .with_dotenv()?
//!     .with_env()
//!     .load()?;
//!
//! println!("Testing against: {}", config.base_url);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! base_url = "http://85.192.34.140:8080/"
//! timeout_ms = 30000
//! log_template = "custom"
//! log_sink = "stdout"
//! request_logging = true
//! response_logging = true
//! interaction_logging = true
//!
//! [logging]
//! enabled = true
//! level = "info"
//! json_format = false
//! ```
//!
//! # Environment Variable Overrides
//!
//! | Variable | Field |
//! |---|---|
//! | `API_BASE_URL` | `base_url` |
//! | `HTTP_TIMEOUT_MS` | `timeout_ms` |
//! | `HERMES_LOG_TEMPLATE` | `log_template` |
//! | `HERMES_LOG_SINK` | `log_sink` |
//! | `HERMES_LOG_LEVEL` | `logging.level` |
//! | `HERMES_REQUEST_LOGGING` | `request_logging` |
//! | `HERMES_RESPONSE_LOGGING` | `response_logging` |

#![doc(html_root_url = "https://docs.rs/hermes-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;

pub use config::{
    HarnessConfig, HarnessConfigBuilder, LoggingSettings, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS,
};
pub use error::ConfigError;
pub use hermes_telemetry::SinkKind;
pub use loader::{
    ConfigLoader, ENV_BASE_URL, ENV_LOG_LEVEL, ENV_LOG_SINK, ENV_LOG_TEMPLATE,
    ENV_REQUEST_LOGGING, ENV_RESPONSE_LOGGING, ENV_TIMEOUT_MS,
};
