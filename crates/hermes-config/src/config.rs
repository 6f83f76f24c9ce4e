//! Harness configuration types.

use hermes_telemetry::{LogConfig, SinkKind, LOG_TEMPLATE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::ConfigError;

/// Base URL of the API under test when nothing overrides it.
pub const DEFAULT_BASE_URL: &str = "http://85.192.34.140:8080/";

/// Transport timeout when nothing overrides it.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Complete harness configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to layer files and environment
/// variables over the defaults.
///
/// # Example
///
/// ```
/// use hermes_config::HarnessConfig;
///
/// let config = HarnessConfig::default();
/// assert_eq!(config.base_url, "http://85.192.34.140:8080/");
/// assert_eq!(config.timeout_ms, 30_000);
/// assert_eq!(config.log_template, "custom");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// Base URL every service path is resolved against.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Transport timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Name of the interaction log template.
    #[serde(default = "default_log_template")]
    pub log_template: String,

    /// User templates by name, registered next to the built-in ones.
    /// A user template named like a built-in replaces it.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub log_templates: BTreeMap<String, String>,

    /// Where interaction log blocks go.
    #[serde(default)]
    pub log_sink: SinkKind,

    /// Install the request logging stage.
    #[serde(default = "default_true")]
    pub request_logging: bool,

    /// Install the response logging stage.
    #[serde(default = "default_true")]
    pub response_logging: bool,

    /// Install the interaction logging stage.
    #[serde(default = "default_true")]
    pub interaction_logging: bool,

    /// Diagnostic logging settings.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            log_template: default_log_template(),
            log_templates: BTreeMap::new(),
            log_sink: SinkKind::default(),
            request_logging: true,
            response_logging: true,
            interaction_logging: true,
            logging: LoggingSettings::default(),
        }
    }
}

impl HarnessConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> HarnessConfigBuilder {
        HarnessConfigBuilder::new()
    }

    /// Returns the transport timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - `base_url` is not an `http://` or `https://` URL with a host
    /// - `timeout_ms` is zero
    /// - `log_template` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        let host = self
            .base_url
            .strip_prefix("http://")
            .or_else(|| self.base_url.strip_prefix("https://"))
            .ok_or_else(|| {
                ConfigError::invalid_value(
                    "base_url",
                    format!("must start with http:// or https://: {}", self.base_url),
                )
            })?;
        if host.trim_matches('/').is_empty() {
            return Err(ConfigError::invalid_value("base_url", "missing host"));
        }

        if self.timeout_ms == 0 {
            return Err(ConfigError::invalid_value(
                "timeout_ms",
                "must be greater than zero",
            ));
        }

        if self.log_template.trim().is_empty() {
            return Err(ConfigError::invalid_value("log_template", "must not be empty"));
        }

        Ok(())
    }
}

/// Diagnostic logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSettings {
    /// Enable diagnostic logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Level or filter directive.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON instead of compact text.
    #[serde(default)]
    pub json_format: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            json_format: false,
        }
    }
}

impl LoggingSettings {
    /// Converts to the subscriber configuration.
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            json_format: self.json_format,
            ..LogConfig::default()
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_log_template() -> String {
    LOG_TEMPLATE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

const fn default_true() -> bool {
    true
}

/// Builder for [`HarnessConfig`].
///
/// # Example
///
/// ```
/// use hermes_config::HarnessConfig;
///
/// let config = HarnessConfig::builder()
///     .base_url("http://localhost:8080")
///     .timeout_ms(500)
///     .interaction_logging(false)
///     .build();
///
/// assert_eq!(config.timeout().as_millis(), 500);
/// assert!(!config.interaction_logging);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HarnessConfigBuilder {
    config: HarnessConfig,
}

impl HarnessConfigBuilder {
    /// Create a builder seeded with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Set the transport timeout in milliseconds.
    #[must_use]
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.timeout_ms = timeout_ms;
        self
    }

    /// Set the interaction log template name.
    #[must_use]
    pub fn log_template(mut self, name: impl Into<String>) -> Self {
        self.config.log_template = name.into();
        self
    }

    /// Add a user template under `name`.
    #[must_use]
    pub fn log_template_source(
        mut self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        self.config.log_templates.insert(name.into(), source.into());
        self
    }

    /// Set the interaction log sink.
    #[must_use]
    pub fn log_sink(mut self, sink: SinkKind) -> Self {
        self.config.log_sink = sink;
        self
    }

    /// Enable or disable the request logging stage.
    #[must_use]
    pub fn request_logging(mut self, enabled: bool) -> Self {
        self.config.request_logging = enabled;
        self
    }

    /// Enable or disable the response logging stage.
    #[must_use]
    pub fn response_logging(mut self, enabled: bool) -> Self {
        self.config.response_logging = enabled;
        self
    }

    /// Enable or disable the interaction logging stage.
    #[must_use]
    pub fn interaction_logging(mut self, enabled: bool) -> Self {
        self.config.interaction_logging = enabled;
        self
    }

    /// Set diagnostic logging settings.
    #[must_use]
    pub fn logging(mut self, logging: LoggingSettings) -> Self {
        self.config.logging = logging;
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> HarnessConfig {
        self.config
    }
}
