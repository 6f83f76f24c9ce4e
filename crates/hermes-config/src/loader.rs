//! Configuration loader with layered approach.
//!
//! This module provides the [`ConfigLoader`] for loading configuration from
//! multiple sources: defaults, files, `.env` and environment variables.

use std::env;
use std::fs;
use std::path::Path;

use hermes_telemetry::SinkKind;

use crate::{ConfigError, HarnessConfig};

/// Environment variable overriding [`HarnessConfig::base_url`].
pub const ENV_BASE_URL: &str = "API_BASE_URL";
/// Environment variable overriding [`HarnessConfig::timeout_ms`].
pub const ENV_TIMEOUT_MS: &str = "HTTP_TIMEOUT_MS";
/// Environment variable overriding [`HarnessConfig::log_template`].
pub const ENV_LOG_TEMPLATE: &str = "HERMES_LOG_TEMPLATE";
/// Environment variable overriding [`HarnessConfig::log_sink`].
pub const ENV_LOG_SINK: &str = "HERMES_LOG_SINK";
/// Environment variable overriding the diagnostic log level.
pub const ENV_LOG_LEVEL: &str = "HERMES_LOG_LEVEL";
/// Environment variable overriding [`HarnessConfig::request_logging`].
pub const ENV_REQUEST_LOGGING: &str = "HERMES_REQUEST_LOGGING";
/// Environment variable overriding [`HarnessConfig::response_logging`].
pub const ENV_RESPONSE_LOGGING: &str = "HERMES_RESPONSE_LOGGING";

const ENV_VARS: [&str; 7] = [
    ENV_BASE_URL,
    ENV_TIMEOUT_MS,
    ENV_LOG_TEMPLATE,
    ENV_LOG_SINK,
    ENV_LOG_LEVEL,
    ENV_REQUEST_LOGGING,
    ENV_RESPONSE_LOGGING,
];

/// Configuration loader with layered approach.
///
/// The loader applies configuration in layers, with later layers overriding
/// earlier ones:
/// 1. Default values (built into the code)
/// 2. Configuration file (TOML or JSON)
/// 3. `.env` file, merged into the process environment
/// 4. Environment variables
///
/// # Example
///
/// ```no_run
/// use hermes_config::ConfigLoader;
///
/// # fn main() -> Result<(), hermes_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_defaults()
///     .with_optional_file("hermes.toml")?
///     .with_dotenv()?
///     .with_env()
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: HarnessConfig,
    use_env: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader seeded with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: HarnessConfig::default(),
            use_env: false,
        }
    }

    /// Start with default configuration values.
    ///
    /// This is called automatically by `new()`, but can be chained for clarity.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = HarnessConfig::default();
        self
    }

    /// Load configuration from a file.
    ///
    /// The format is chosen by extension (`.toml` or `.json`). Fields the
    /// file omits keep their default values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The file does not exist
    /// - The file cannot be read
    /// - The file contains invalid TOML/JSON
    /// - The file contains unknown fields
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;

        self.config = Self::parse_file(&content, path)?;
        Ok(self)
    }

    /// Load configuration from an optional file.
    ///
    /// If the file exists, loads it. If not, silently continues.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be read or parsed.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from a string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails or `format` is neither
    /// `"toml"` nor `"json"`.
    ///
    /// # Example
    ///
    /// ```
    /// use hermes_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::new()
    ///     .with_string(r#"base_url = "http://localhost:8080/""#, "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(config.base_url, "http://localhost:8080/");
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        self.config = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            _ => {
                return Err(ConfigError::validation_error(format!(
                    "unsupported configuration format: {format}"
                )))
            }
        };
        Ok(self)
    }

    /// Load a `.env` file into the process environment.
    ///
    /// A missing `.env` is not an error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EnvParseError` if a `.env` exists but is malformed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(ConfigError::env_parse_error(".env", e.to_string())),
        }
    }

    /// Apply environment variable overrides when loading.
    ///
    /// Recognized variables: `API_BASE_URL`, `HTTP_TIMEOUT_MS`,
    /// `HERMES_LOG_TEMPLATE`, `HERMES_LOG_SINK`, `HERMES_LOG_LEVEL`,
    /// `HERMES_REQUEST_LOGGING`, `HERMES_RESPONSE_LOGGING`.
    #[must_use]
    pub fn with_env(mut self) -> Self {
        self.use_env = true;
        self
    }

    /// Finalize and return the validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Environment variable parsing fails
    /// - Configuration validation fails
    pub fn load(self) -> Result<HarnessConfig, ConfigError> {
        let config = self.resolve()?;
        config.validate()?;
        Ok(config)
    }

    /// Finalize without validation.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an environment variable cannot be parsed.
    pub fn load_unvalidated(self) -> Result<HarnessConfig, ConfigError> {
        self.resolve()
    }

    fn resolve(mut self) -> Result<HarnessConfig, ConfigError> {
        if self.use_env {
            for key in ENV_VARS {
                if let Ok(value) = env::var(key) {
                    self.apply_env_var(key, &value)?;
                }
            }
        }
        Ok(self.config)
    }

    // Parse configuration file based on extension
    fn parse_file(content: &str, path: &Path) -> Result<HarnessConfig, ConfigError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(toml::from_str(content)?),
            Some("json") => Ok(serde_json::from_str(content)?),
            _ => Err(ConfigError::validation_error(format!(
                "unsupported configuration file format: {}",
                path.display()
            ))),
        }
    }

    // Apply a single environment variable
    fn apply_env_var(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            ENV_BASE_URL => {
                self.config.base_url = value.trim().to_string();
            }
            ENV_TIMEOUT_MS => {
                self.config.timeout_ms = value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::env_parse_error(key, "expected integer"))?;
            }
            ENV_LOG_TEMPLATE => {
                self.config.log_template = value.trim().to_string();
            }
            ENV_LOG_SINK => {
                self.config.log_sink = SinkKind::parse(value).ok_or_else(|| {
                    ConfigError::env_parse_error(key, "expected 'stdout', 'stderr', or 'tracing'")
                })?;
            }
            ENV_LOG_LEVEL => {
                self.config.logging.level = value.trim().to_string();
            }
            ENV_REQUEST_LOGGING => {
                self.config.request_logging = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            ENV_RESPONSE_LOGGING => {
                self.config.response_logging = parse_bool(value)
                    .ok_or_else(|| ConfigError::env_parse_error(key, "expected boolean"))?;
            }
            // Unknown key - ignore
            _ => {}
        }

        Ok(())
    }
}

/// Parse a boolean from a string.
fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
