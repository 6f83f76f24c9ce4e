//! Validatable response wrapper.

use crate::condition::Condition;
use crate::error::ConditionError;
use bytes::Bytes;
use hermes_core::{HermesError, HermesResult};
use hermes_middleware::Response;
use http::{HeaderMap, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;

/// One completed exchange, ready for assertions and typed extraction.
///
/// The handle is immutable: [`should`](Self::should) returns the same
/// reference, and the JSON tree is parsed once on first access.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use hermes_test::{conditions::has_status_code, ValidatableResponse};
/// use http::{HeaderMap, StatusCode};
///
/// let response = ValidatableResponse::new(
///     StatusCode::OK,
///     HeaderMap::new(),
///     Bytes::from_static(br#"{"info":{"message":"User created"}}"#),
/// );
///
/// response.should(has_status_code(200));
/// assert_eq!(response.json_path("info.message").unwrap(), "User created");
/// ```
pub struct ValidatableResponse {
    request: Option<(Method, String)>,
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    elapsed: Duration,
    // Parse failures are kept as text: `serde_json::Error` is not `Clone`.
    parsed: OnceLock<Result<Value, String>>,
}

impl ValidatableResponse {
    /// Creates a response from raw parts, detached from any request.
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            request: None,
            status,
            headers,
            body,
            elapsed: Duration::ZERO,
            parsed: OnceLock::new(),
        }
    }

    pub(crate) fn from_exchange(
        method: Method,
        url: String,
        response: Response,
        elapsed: Duration,
    ) -> Self {
        let (parts, body) = response.into_parts();
        Self {
            request: Some((method, url)),
            status: parts.status,
            headers: parts.headers,
            body,
            elapsed,
            parsed: OnceLock::new(),
        }
    }

    /// Returns the status code as a u16.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Gets a header value as a string.
    ///
    /// Header names are case-insensitive. A value that is not visible ASCII
    /// reads as absent.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns all response headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the raw body bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the body as text.
    pub fn text(&self) -> HermesResult<&str> {
        std::str::from_utf8(&self.body)
            .map_err(|e| HermesError::malformed("$", format!("body is not UTF-8: {e}")))
    }

    /// Time from issuing the request to receiving the full body.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// `METHOD URL` of the request that produced this response.
    #[must_use]
    pub fn request_line(&self) -> String {
        match &self.request {
            Some((method, url)) => format!("{method} {url}"),
            None => "<detached response>".to_string(),
        }
    }

    /// Returns the parsed JSON body.
    ///
    /// Parsing happens once; later calls reuse the tree.
    pub fn json(&self) -> HermesResult<&Value> {
        self.parsed
            .get_or_init(|| serde_json::from_slice(&self.body).map_err(|e| e.to_string()))
            .as_ref()
            .map_err(|reason| HermesError::malformed("$", format!("body is not JSON: {reason}")))
    }

    /// Reads the value at a dotted path (`info.message`, `items.0`).
    ///
    /// An absent path yields `Value::Null`.
    ///
    /// # Errors
    ///
    /// Returns `HermesError::MalformedResponse` only when the body is not JSON.
    pub fn json_path(&self, expr: &str) -> HermesResult<Value> {
        let root = self.json()?;
        Ok(lookup(root, expr).cloned().unwrap_or(Value::Null))
    }

    /// Deserializes the subtree at `path`.
    ///
    /// # Errors
    ///
    /// Returns `HermesError::MalformedResponse` naming the path when it is
    /// absent or does not match `T`.
    pub fn get_object<T: DeserializeOwned>(&self, path: &str) -> HermesResult<T> {
        let root = self.json()?;
        let value = lookup(root, path).ok_or_else(|| HermesError::missing_field(path))?;
        T::deserialize(value).map_err(|e| HermesError::malformed(path, e.to_string()))
    }

    /// Deserializes the whole body.
    pub fn as_object<T: DeserializeOwned>(&self) -> HermesResult<T> {
        let root = self.json()?;
        T::deserialize(root).map_err(|e| HermesError::malformed("$", e.to_string()))
    }

    /// Deserializes the body as a homogeneous array.
    pub fn as_list<T: DeserializeOwned>(&self) -> HermesResult<Vec<T>> {
        let root = self.json()?;
        let Value::Array(items) = root else {
            return Err(HermesError::malformed(
                "$",
                format!("expected a JSON array, got {}", kind(root)),
            ));
        };
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                T::deserialize(item)
                    .map_err(|e| HermesError::malformed(format!("{index}"), e.to_string()))
            })
            .collect()
    }

    /// Returns the bearer token from the `token` field.
    ///
    /// # Errors
    ///
    /// Fails when `token` is absent, not a string or empty.
    pub fn as_jwt(&self) -> HermesResult<String> {
        let root = self.json()?;
        match root.get("token") {
            None | Some(Value::Null) => Err(HermesError::missing_field("token")),
            Some(Value::String(token)) if token.is_empty() => {
                Err(HermesError::malformed("token", "token is empty"))
            }
            Some(Value::String(token)) => Ok(token.clone()),
            Some(other) => Err(HermesError::malformed(
                "token",
                format!("expected a string, got {}", kind(other)),
            )),
        }
    }

    /// Checks a condition and returns the same handle.
    ///
    /// # Panics
    ///
    /// Panics with the condition's diagnostic when it does not hold.
    pub fn should(&self, condition: impl Condition) -> &Self {
        if let Err(err) = condition.check(self) {
            panic!(
                "condition `{}` failed for {}: {}",
                err.condition(),
                self.request_line(),
                err.diagnostic()
            );
        }
        self
    }

    /// Checks a condition without panicking.
    pub fn try_should(&self, condition: impl Condition) -> Result<&Self, ConditionError> {
        condition.check(self)?;
        Ok(self)
    }
}

impl fmt::Debug for ValidatableResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatableResponse")
            .field("request", &self.request_line())
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body_len", &self.body.len())
            .field("elapsed", &self.elapsed)
            .finish()
    }
}

/// Walks a dotted path; numeric segments index arrays. `$` and the empty
/// path address the root.
fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.') {
        if segment.is_empty() || segment == "$" {
            continue;
        }
        current = match current {
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => current.get(segment)?,
        };
    }
    Some(current)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// `{"message": ...}` as found under the `info` envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct InfoMessage {
    pub(crate) message: String,
}
