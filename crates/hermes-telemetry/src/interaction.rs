//! The record of one HTTP exchange, as seen by the interaction logger.

use bytes::Bytes;
use chrono::{DateTime, Local};
use hermes_core::RequestId;
use http::{header, HeaderMap, Method, StatusCode};
use std::time::Duration;

/// One request/response pair captured for rendering.
#[derive(Debug, Clone)]
pub struct Interaction {
    /// Identifier of the exchange.
    pub request_id: RequestId,
    /// Wall-clock time the request was issued.
    pub timestamp: DateTime<Local>,
    /// Request method.
    pub method: Method,
    /// Absolute request URL.
    pub url: String,
    /// Request headers.
    pub request_headers: HeaderMap,
    /// Request body.
    pub request_body: Bytes,
    /// What came back.
    pub outcome: InteractionOutcome,
    /// Time from dispatch to response (or failure).
    pub elapsed: Duration,
}

/// The result half of an [`Interaction`].
#[derive(Debug, Clone)]
pub enum InteractionOutcome {
    /// A response arrived, whatever its status.
    Completed {
        /// Response status.
        status: StatusCode,
        /// Response headers.
        headers: HeaderMap,
        /// Response body.
        body: Bytes,
    },
    /// The exchange failed before a response existed.
    Failed {
        /// Rendered transport error.
        error: String,
    },
}

impl Interaction {
    /// Returns the response status, if a response arrived.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match &self.outcome {
            InteractionOutcome::Completed { status, .. } => Some(*status),
            InteractionOutcome::Failed { .. } => None,
        }
    }

    /// Returns the transport error, if the exchange failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            InteractionOutcome::Completed { .. } => None,
            InteractionOutcome::Failed { error } => Some(error),
        }
    }

    /// Returns elapsed time in whole milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed.as_millis()
    }
}

/// Renders headers as `name: value` lines.
#[must_use]
pub fn format_headers(headers: &HeaderMap) -> String {
    let mut lines = Vec::with_capacity(headers.len());
    for (name, value) in headers {
        let value = value.to_str().unwrap_or("<binary>");
        lines.push(format!("{name}: {value}"));
    }
    lines.join("\n")
}

/// Renders a body for humans.
///
/// JSON bodies (by `Content-Type`) are pretty-printed; anything else, or
/// JSON that fails to parse, is shown as lossy UTF-8.
#[must_use]
pub fn format_body(headers: &HeaderMap, body: &Bytes) -> String {
    if body.is_empty() {
        return String::new();
    }

    if is_json(headers) {
        if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
            if let Ok(pretty) = serde_json::to_string_pretty(&value) {
                return pretty;
            }
        }
    }

    String::from_utf8_lossy(body).into_owned()
}

/// Renders a status as `201 Created`.
#[must_use]
pub fn format_status(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    #[test]
    fn test_format_headers() {
        let mut headers = json_headers();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let rendered = format_headers(&headers);
        assert!(rendered.contains("content-type: application/json"));
        assert!(rendered.contains("accept: application/json"));
        assert_eq!(rendered.lines().count(), 2);
    }

    #[test]
    fn test_format_body_pretty_prints_json() {
        let body = Bytes::from_static(br#"{"info":{"message":"User created"}}"#);
        let rendered = format_body(&json_headers(), &body);
        assert!(rendered.contains('\n'));
        assert!(rendered.contains("\"message\": \"User created\""));
    }

    #[test]
    fn test_format_body_keeps_raw_text() {
        let body = Bytes::from_static(b"plain text");
        assert_eq!(format_body(&HeaderMap::new(), &body), "plain text");
    }

    #[test]
    fn test_format_body_invalid_json_falls_back() {
        let body = Bytes::from_static(b"{not json");
        assert_eq!(format_body(&json_headers(), &body), "{not json");
    }

    #[test]
    fn test_format_status() {
        assert_eq!(format_status(StatusCode::CREATED), "201 Created");
        assert_eq!(format_status(StatusCode::UNAUTHORIZED), "401 Unauthorized");
    }
}
