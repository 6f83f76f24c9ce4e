//! Telemetry error types.

use thiserror::Error;

/// Errors that can occur while setting up logging or templates.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to initialize logging.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// No template is registered under the requested name.
    #[error("Unknown log template: {0}")]
    UnknownTemplate(String),

    /// A template references a placeholder that does not exist.
    #[error("Template '{template}' uses unknown placeholder '{field}'")]
    UnknownField {
        /// Template name.
        template: String,
        /// The unrecognized placeholder.
        field: String,
    },

    /// A template is syntactically invalid.
    #[error("Template '{template}' is invalid: {message}")]
    TemplateSyntax {
        /// Template name.
        template: String,
        /// What is wrong with it.
        message: String,
    },
}
