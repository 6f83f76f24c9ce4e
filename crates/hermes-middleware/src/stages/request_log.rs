//! Request logging stage.
//!
//! Emits one structured `tracing` event per outgoing request, before the
//! request reaches the transport.

use crate::context::ExchangeContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response};
use hermes_core::HermesResult;
use tracing::Level;

/// Logs the method and URL of every outgoing request.
#[derive(Debug, Clone, Copy)]
pub struct RequestLoggingMiddleware {
    level: Level,
}

impl RequestLoggingMiddleware {
    /// Creates the stage, logging at `INFO`.
    #[must_use]
    pub const fn new() -> Self {
        Self { level: Level::INFO }
    }

    /// Creates the stage, logging at `level`.
    #[must_use]
    pub const fn with_level(level: Level) -> Self {
        Self { level }
    }
}

impl Default for RequestLoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl Middleware for RequestLoggingMiddleware {
    fn name(&self) -> &'static str {
        "request_logging"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut ExchangeContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, HermesResult<Response>> {
        Box::pin(async move {
            let request_id = ctx.request_id().to_string();
            let method = request.method().as_str();
            let url = request.uri().to_string();
            let body_bytes = request.body().len();

            if self.level == Level::DEBUG || self.level == Level::TRACE {
                tracing::debug!(
                    request_id = %request_id,
                    http.method = %method,
                    http.url = %url,
                    body_bytes,
                    "Sending request"
                );
            } else {
                tracing::info!(
                    request_id = %request_id,
                    http.method = %method,
                    http.url = %url,
                    body_bytes,
                    "Sending request"
                );
            }

            next.run(ctx, request).await
        })
    }
}
