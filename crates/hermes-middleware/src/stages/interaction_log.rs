//! Interaction logging stage.
//!
//! Renders every request/response pair through a named template and writes
//! the block to a sink. The template is resolved when the stage is built,
//! so an unknown name is a setup error rather than a per-request one.
//!
//! # Example
//!
//! ```
//! use hermes_middleware::stages::InteractionLogMiddleware;
//! use hermes_telemetry::{MemorySink, TemplateRegistry};
//! use std::sync::Arc;
//!
//! let registry = TemplateRegistry::with_builtins();
//! let sink = MemorySink::new();
//! let stage = InteractionLogMiddleware::new(&registry, "compact", Arc::new(sink)).unwrap();
//! assert_eq!(stage.template_name(), "compact");
//! ```

use crate::context::ExchangeContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response};
use hermes_core::HermesResult;
use hermes_telemetry::{
    Interaction, InteractionLogger, InteractionOutcome, LogSink, TelemetryResult, TemplateRegistry,
};
use std::sync::Arc;
use std::time::Instant;

/// Logs each exchange as a rendered template block.
#[derive(Debug, Clone)]
pub struct InteractionLogMiddleware {
    logger: InteractionLogger,
}

impl InteractionLogMiddleware {
    /// Creates the stage for the template registered as `template`.
    ///
    /// # Errors
    ///
    /// Returns `TelemetryError::UnknownTemplate` if no such template exists.
    pub fn new(
        registry: &TemplateRegistry,
        template: &str,
        sink: Arc<dyn LogSink>,
    ) -> TelemetryResult<Self> {
        Ok(Self {
            logger: InteractionLogger::new(registry, template, sink)?,
        })
    }

    /// Creates the stage from a ready logger.
    #[must_use]
    pub const fn from_logger(logger: InteractionLogger) -> Self {
        Self { logger }
    }

    /// Returns the name of the template in use.
    #[must_use]
    pub fn template_name(&self) -> &str {
        self.logger.template_name()
    }
}

impl Middleware for InteractionLogMiddleware {
    fn name(&self) -> &'static str {
        "interaction_logging"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut ExchangeContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, HermesResult<Response>> {
        Box::pin(async move {
            let method = request.method().clone();
            let url = request.uri().to_string();
            let request_headers = request.headers().clone();
            let request_body = request.body().clone();
            let start = Instant::now();

            let result = next.run(ctx, request).await;

            let outcome = match &result {
                Ok(response) => InteractionOutcome::Completed {
                    status: response.status(),
                    headers: response.headers().clone(),
                    body: response.body().clone(),
                },
                Err(e) => InteractionOutcome::Failed {
                    error: e.to_string(),
                },
            };

            self.logger.log(&Interaction {
                request_id: ctx.request_id(),
                timestamp: ctx.issued_at(),
                method,
                url,
                request_headers,
                request_body,
                outcome,
                elapsed: start.elapsed(),
            });

            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::FnTransport;
    use crate::types::ResponseExt;
    use bytes::Bytes;
    use hermes_core::HermesError;
    use hermes_telemetry::{MemorySink, TelemetryError, DEFAULT_TEMPLATE};
    use http::{header, HeaderValue, Method, StatusCode};
    use serde_json::json;

    fn signup_request() -> Request {
        let mut request = Request::new(Bytes::from_static(br#"{"login":"bob","pass":"pw"}"#));
        *request.method_mut() = Method::POST;
        *request.uri_mut() = "http://localhost:8080/api/signup".parse().unwrap();
        request
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        request
    }

    #[test]
    fn test_unknown_template_is_setup_error() {
        let registry = TemplateRegistry::with_builtins();
        let err = InteractionLogMiddleware::new(&registry, "missing", Arc::new(MemorySink::new()))
            .unwrap_err();
        assert!(matches!(err, TelemetryError::UnknownTemplate(_)));
    }

    #[tokio::test]
    async fn test_logs_completed_exchange() {
        let sink = MemorySink::new();
        let registry = TemplateRegistry::with_builtins();
        let stage =
            InteractionLogMiddleware::new(&registry, DEFAULT_TEMPLATE, Arc::new(sink.clone()))
                .unwrap();
        let transport = FnTransport::new(|_| {
            Response::json(StatusCode::CREATED, &json!({"info": {"message": "User created"}}))
        });

        let mut ctx = ExchangeContext::new();
        let response = stage
            .process(&mut ctx, signup_request(), Next::transport(&transport))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let blocks = sink.blocks();
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].starts_with("POST http://localhost:8080/api/signup"));
        assert!(blocks[0].contains("\"login\": \"bob\""));
        assert!(blocks[0].contains("HTTP 201 Created"));
        assert!(blocks[0].contains("\"message\": \"User created\""));
    }

    #[tokio::test]
    async fn test_logs_failed_exchange_and_returns_error() {
        let sink = MemorySink::new();
        let registry = TemplateRegistry::with_builtins();
        let stage = InteractionLogMiddleware::new(&registry, "compact", Arc::new(sink.clone()))
            .unwrap();
        let transport = FnTransport::new(|_| Err(HermesError::transport("connection refused")));

        let mut ctx = ExchangeContext::new();
        let err = stage
            .process(&mut ctx, signup_request(), Next::transport(&transport))
            .await
            .unwrap_err();

        assert!(err.is_transport());
        let blocks = sink.blocks();
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].contains("<no response>"));
        assert!(blocks[0].contains("connection refused"));
    }
}
