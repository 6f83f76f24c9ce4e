//! Common types used throughout the middleware pipeline.
//!
//! Bodies are fully buffered: the harness always needs the whole body, both
//! to log it and to parse it, so there is no streaming body type.

use bytes::Bytes;
use hermes_core::HermesResult;
use http::{header, HeaderValue, StatusCode};

/// The HTTP request type used in the middleware pipeline.
pub type Request = http::Request<Bytes>;

/// The HTTP response type used in the middleware pipeline.
pub type Response = http::Response<Bytes>;

/// Extension trait for building canned responses.
///
/// Used by stub transports; real responses come from the network.
pub trait ResponseExt {
    /// Creates a response with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `HermesError::Json` if `body` cannot be serialized.
    fn json(status: StatusCode, body: &serde_json::Value) -> HermesResult<Response>;

    /// Creates a response with an empty body.
    fn empty(status: StatusCode) -> Response;
}

impl ResponseExt for Response {
    fn json(status: StatusCode, body: &serde_json::Value) -> HermesResult<Response> {
        let bytes = serde_json::to_vec(body)?;
        let mut response = http::Response::new(Bytes::from(bytes));
        *response.status_mut() = status;
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        Ok(response)
    }

    fn empty(status: StatusCode) -> Response {
        let mut response = http::Response::new(Bytes::new());
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_response() {
        let response =
            Response::json(StatusCode::CREATED, &json!({"info": {"message": "ok"}})).unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(response.body().as_ref(), br#"{"info":{"message":"ok"}}"#);
    }

    #[test]
    fn test_empty_response() {
        let response = Response::empty(StatusCode::NO_CONTENT);
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.body().is_empty());
    }
}
