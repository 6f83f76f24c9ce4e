//! Per-exchange context.
//!
//! The [`ExchangeContext`] carries state through the middleware pipeline for
//! one request: its identifier and when it was issued.

use chrono::{DateTime, Local};
use hermes_core::RequestId;
use std::time::{Duration, Instant};

/// Context that flows through the middleware pipeline.
///
/// # Example
///
/// ```
/// use hermes_middleware::context::ExchangeContext;
///
/// let ctx = ExchangeContext::new();
/// assert!(ctx.elapsed().as_secs() < 1);
/// ```
#[derive(Debug, Clone)]
pub struct ExchangeContext {
    /// Unique identifier for this exchange.
    request_id: RequestId,

    /// Monotonic start of the exchange.
    started_at: Instant,

    /// Wall-clock start of the exchange, for log output.
    issued_at: DateTime<Local>,
}

impl ExchangeContext {
    /// Creates a new context with a fresh request ID.
    #[must_use]
    pub fn new() -> Self {
        Self::with_request_id(RequestId::new())
    }

    /// Creates a context with a specific request ID.
    #[must_use]
    pub fn with_request_id(request_id: RequestId) -> Self {
        Self {
            request_id,
            started_at: Instant::now(),
            issued_at: Local::now(),
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns when the exchange started.
    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Returns the wall-clock time the exchange started.
    #[must_use]
    pub fn issued_at(&self) -> DateTime<Local> {
        self.issued_at
    }

    /// Returns the elapsed time since the exchange started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

impl Default for ExchangeContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_has_fresh_id() {
        let a = ExchangeContext::new();
        let b = ExchangeContext::new();
        assert_ne!(a.request_id(), b.request_id());
    }

    #[test]
    fn test_with_request_id() {
        let id = RequestId::new();
        let ctx = ExchangeContext::with_request_id(id);
        assert_eq!(ctx.request_id(), id);
        assert!(ctx.started_at() <= Instant::now());
    }
}
