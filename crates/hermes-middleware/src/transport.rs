//! HTTP executors.
//!
//! The [`Transport`] is the end of every pipeline: it turns a request into a
//! response or a transport error. [`ReqwestTransport`] talks to the network;
//! [`FnTransport`] answers from a closure and is used to run the harness
//! without a live server.

use crate::middleware::BoxFuture;
use crate::types::{Request, Response};
use hermes_core::{HermesError, HermesResult};
use std::time::Duration;

/// Sends a fully built request and returns the complete response.
///
/// A response with an error status is still `Ok`: only failures that leave
/// no response (connection, timeout, I/O) are errors.
pub trait Transport: Send + Sync {
    /// Executes one request.
    fn execute(&self, request: Request) -> BoxFuture<'_, HermesResult<Response>>;
}

/// Transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Creates a transport whose requests fail with `Timeout` after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `HermesError::Setup` if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> HermesResult<Self> {
        // No idle pooling: a shared transport outlives the per-test runtimes
        // that would own pooled connections.
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| HermesError::setup(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, timeout })
    }

    /// Returns the configured timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    fn map_error(&self, url: &str, error: &reqwest::Error) -> HermesError {
        if error.is_timeout() {
            let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
            HermesError::timeout(url, timeout_ms)
        } else if error.is_builder() {
            HermesError::invalid_request(error.to_string())
        } else {
            HermesError::transport(format!("{url}: {error}"))
        }
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: Request) -> BoxFuture<'_, HermesResult<Response>> {
        Box::pin(async move {
            let (parts, body) = request.into_parts();
            let url = parts.uri.to_string();

            let mut builder = self
                .client
                .request(parts.method, &url)
                .headers(parts.headers);
            if !body.is_empty() {
                builder = builder.body(body);
            }

            let response = builder
                .send()
                .await
                .map_err(|e| self.map_error(&url, &e))?;

            let status = response.status();
            let version = response.version();
            let headers = response.headers().clone();
            let body = response
                .bytes()
                .await
                .map_err(|e| self.map_error(&url, &e))?;

            let mut out = Response::new(body);
            *out.status_mut() = status;
            *out.version_mut() = version;
            *out.headers_mut() = headers;
            Ok(out)
        })
    }
}

/// Transport answering from a closure.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use hermes_middleware::{FnTransport, Response};
///
/// let transport = FnTransport::new(|_request| Ok(Response::new(Bytes::from_static(b"[]"))));
/// ```
pub struct FnTransport {
    handler: Box<dyn Fn(Request) -> HermesResult<Response> + Send + Sync>,
}

impl FnTransport {
    /// Creates a transport that calls `handler` for every request.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(Request) -> HermesResult<Response> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
        }
    }
}

impl Transport for FnTransport {
    fn execute(&self, request: Request) -> BoxFuture<'_, HermesResult<Response>> {
        let result = (self.handler)(request);
        Box::pin(async move { result })
    }
}

impl std::fmt::Debug for FnTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTransport").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::{Method, StatusCode};

    #[tokio::test]
    async fn test_fn_transport_passes_request() {
        let transport = FnTransport::new(|request: Request| {
            let mut response = Response::new(Bytes::from(request.method().to_string()));
            *response.status_mut() = StatusCode::ACCEPTED;
            Ok(response)
        });

        let mut request = Request::new(Bytes::new());
        *request.method_mut() = Method::DELETE;

        let response = transport.execute(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(response.body().as_ref(), b"DELETE");
    }

    #[tokio::test]
    async fn test_fn_transport_propagates_errors() {
        let transport = FnTransport::new(|_| Err(HermesError::transport("connection refused")));
        let err = transport.execute(Request::new(Bytes::new())).await.unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn test_reqwest_transport_keeps_timeout() {
        let transport = ReqwestTransport::new(Duration::from_millis(1500)).unwrap();
        assert_eq!(transport.timeout(), Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_reqwest_transport_connection_refused_is_transport_error() {
        let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
        let mut request = Request::new(Bytes::new());
        *request.uri_mut() = "http://127.0.0.1:9/api/users".parse().unwrap();

        let err = transport.execute(request).await.unwrap_err();
        assert!(err.is_transport());
    }
}
