//! Response logging stage.

use crate::context::ExchangeContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response};
use hermes_core::HermesResult;
use std::time::Instant;

/// Logs the status and duration of every exchange, or its transport error.
///
/// Error statuses are logged at `INFO` like any other: a 4xx is an expected
/// outcome in a negative test, not a harness failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseLoggingMiddleware;

impl ResponseLoggingMiddleware {
    /// Creates the stage.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Middleware for ResponseLoggingMiddleware {
    fn name(&self) -> &'static str {
        "response_logging"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut ExchangeContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, HermesResult<Response>> {
        Box::pin(async move {
            let start = Instant::now();
            let url = request.uri().to_string();

            let result = next.run(ctx, request).await;
            let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

            match &result {
                Ok(response) => tracing::info!(
                    request_id = %ctx.request_id(),
                    http.url = %url,
                    http.status_code = response.status().as_u16(),
                    duration_ms,
                    body_bytes = response.body().len(),
                    "Received response"
                ),
                Err(e) => tracing::warn!(
                    request_id = %ctx.request_id(),
                    http.url = %url,
                    duration_ms,
                    error = %e,
                    error.category = e.category(),
                    "Request failed"
                ),
            }

            result
        })
    }
}
