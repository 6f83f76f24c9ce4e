//! Request builder bound to an [`ApiClient`].

use crate::client::ApiClient;
use crate::response::ValidatableResponse;
use bytes::Bytes;
use hermes_core::{HermesError, HermesResult};
use http::{header, HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;

/// JSON media type sent in `Accept` and `Content-Type`.
pub const APPLICATION_JSON: &str = "application/json";

/// A request under construction.
///
/// Builder methods never panic: the first invalid header or unserializable
/// body is kept and returned by [`send`](Self::send).
///
/// # Example
///
/// ```no_run
/// use hermes_test::{conditions::has_status_code, ApiClient};
///
/// # async fn run(client: &ApiClient) -> hermes_core::HermesResult<()> {
/// client
///     .get("/api/users")
///     .accept("application/json")
///     .send()
///     .await?
///     .should(has_status_code(200));
/// # Ok(())
/// # }
/// ```
#[must_use = "a request does nothing until it is sent"]
pub struct ApiRequest<'c> {
    client: &'c ApiClient,
    method: Method,
    target: String,
    headers: HeaderMap,
    body: Bytes,
    error: Option<HermesError>,
}

impl<'c> ApiRequest<'c> {
    pub(crate) fn new(client: &'c ApiClient, method: Method, target: impl Into<String>) -> Self {
        Self {
            client,
            method,
            target: target.into(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            error: None,
        }
    }

    /// Sets a header, replacing any previous value.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let name = name.as_ref();
        let parsed = HeaderName::try_from(name)
            .map_err(|e| HermesError::invalid_request(format!("invalid header name '{name}': {e}")))
            .and_then(|name| {
                HeaderValue::try_from(value.as_ref())
                    .map(|value| (name, value))
                    .map_err(|e| {
                        HermesError::invalid_request(format!("invalid header value: {e}"))
                    })
            });
        match parsed {
            Ok((name, value)) => {
                self.headers.insert(name, value);
            }
            Err(err) => self.fail(err),
        }
        self
    }

    /// Sets the `Accept` header.
    pub fn accept(self, accept: impl AsRef<str>) -> Self {
        self.header(header::ACCEPT.as_str(), accept)
    }

    /// Sets the `Content-Type` header.
    pub fn content_type(self, content_type: impl AsRef<str>) -> Self {
        self.header(header::CONTENT_TYPE.as_str(), content_type)
    }

    /// Sets `Authorization: Bearer <token>`.
    pub fn bearer_token(self, token: impl AsRef<str>) -> Self {
        self.header(
            header::AUTHORIZATION.as_str(),
            format!("Bearer {}", token.as_ref()),
        )
    }

    /// Sets the raw request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Serializes `value` as the body and sets `Content-Type: application/json`.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => {
                self.body = Bytes::from(bytes);
                self.content_type(APPLICATION_JSON)
            }
            Err(err) => {
                self.fail(err.into());
                self
            }
        }
    }

    /// Sends the request through the client's pipeline.
    ///
    /// # Errors
    ///
    /// Returns the first builder error, or the transport error when no
    /// response was received. Error statuses are not errors.
    pub async fn send(self) -> HermesResult<ValidatableResponse> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let url = self.client.url(&self.target);
        let mut request = http::Request::builder()
            .method(self.method)
            .uri(url.as_str())
            .body(self.body)
            .map_err(|e| HermesError::invalid_request(format!("{url}: {e}")))?;
        *request.headers_mut() = self.headers;
        self.client.execute(request).await
    }

    fn fail(&mut self, err: HermesError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

impl std::fmt::Debug for ApiRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("target", &self.target)
            .field("headers", &self.headers)
            .field("body_len", &self.body.len())
            .field("error", &self.error)
            .finish()
    }
}
