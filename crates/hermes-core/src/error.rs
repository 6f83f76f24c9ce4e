//! Error types for Hermes.
//!
//! [`HermesError`] covers every failure a harness call can surface to a test:
//!
//! | Kind | Variant | Raised by |
//! |---|---|---|
//! | Transport failure | `Transport`, `Timeout` | the HTTP executor |
//! | Bad request construction | `InvalidRequest` | request builders |
//! | Malformed response | `MalformedResponse`, `Json` | extraction methods |
//! | Setup failure | `Setup` | configuration and bootstrap |
//!
//! API-level failures (4xx/5xx) are deliberately absent: a response with an
//! error status is still a response and is returned to the caller as such.

use thiserror::Error;

/// Result type alias using [`HermesError`].
pub type HermesResult<T> = Result<T, HermesError>;

/// Standard error type for Hermes.
///
/// # Example
///
/// ```
/// use hermes_core::HermesError;
///
/// let err = HermesError::missing_field("token");
/// assert!(err.to_string().contains("token"));
/// assert!(err.is_malformed_response());
/// ```
#[derive(Error, Debug)]
pub enum HermesError {
    /// The request never produced a response (connection refused, DNS, I/O).
    #[error("Transport error: {message}")]
    Transport {
        /// Human-readable error message.
        message: String,
    },

    /// The transport gave up waiting for the response.
    #[error("Timeout: request to {url} exceeded {timeout_ms} ms")]
    Timeout {
        /// The absolute URL that timed out.
        url: String,
        /// The configured timeout in milliseconds.
        timeout_ms: u64,
    },

    /// The request could not be built (bad URI, header, or body).
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Human-readable error message.
        message: String,
    },

    /// The response does not have the shape the caller asked for.
    #[error("Malformed response at '{path}': {reason}")]
    MalformedResponse {
        /// JSON path that was being extracted (`$` for the whole body).
        path: String,
        /// What went wrong.
        reason: String,
    },

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Harness setup failed (configuration, logging, template selection).
    #[error("Setup error: {message}")]
    Setup {
        /// Human-readable error message.
        message: String,
    },
}

impl HermesError {
    /// Creates a transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(url: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            url: url.into(),
            timeout_ms,
        }
    }

    /// Creates an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a malformed response error for a JSON path.
    #[must_use]
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a malformed response error for a field that is absent.
    #[must_use]
    pub fn missing_field(path: impl Into<String>) -> Self {
        Self::malformed(path, "field is absent")
    }

    /// Creates a setup error.
    #[must_use]
    pub fn setup(message: impl Into<String>) -> Self {
        Self::Setup {
            message: message.into(),
        }
    }

    /// Returns true if no response exists because the exchange itself failed.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }

    /// Returns true if the error came from extracting data out of a response.
    #[must_use]
    pub const fn is_malformed_response(&self) -> bool {
        matches!(self, Self::MalformedResponse { .. } | Self::Json(_))
    }

    /// Returns a short, stable category name for log fields.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Timeout { .. } => "timeout",
            Self::InvalidRequest { .. } => "invalid_request",
            Self::MalformedResponse { .. } => "malformed_response",
            Self::Json(_) => "json",
            Self::Setup { .. } => "setup",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_display() {
        let err = HermesError::transport("connection refused");
        assert_eq!(err.to_string(), "Transport error: connection refused");
        assert!(err.is_transport());
        assert_eq!(err.category(), "transport");
    }

    #[test]
    fn test_timeout_display() {
        let err = HermesError::timeout("http://localhost/api/users", 30_000);
        assert!(err.to_string().contains("http://localhost/api/users"));
        assert!(err.to_string().contains("30000 ms"));
        assert!(err.is_transport());
    }

    #[test]
    fn test_malformed_names_path() {
        let err = HermesError::missing_field("info.message");
        assert_eq!(
            err.to_string(),
            "Malformed response at 'info.message': field is absent"
        );
        assert!(err.is_malformed_response());
        assert!(!err.is_transport());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: HermesError = json_err.into();
        assert!(err.is_malformed_response());
        assert_eq!(err.category(), "json");
    }
}
