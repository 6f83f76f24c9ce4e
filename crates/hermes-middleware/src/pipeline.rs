//! Ordered middleware pipeline.
//!
//! Stages are composed around the transport once, at construction. The
//! first stage added is the outermost: it sees the request first and the
//! response last.
//!
//! ```text
//! request ─▶ stage 1 ─▶ stage 2 ─▶ … ─▶ Transport
//! result  ◀─ stage 1 ◀─ stage 2 ◀─ … ◀─┘
//! ```

use crate::context::ExchangeContext;
use crate::middleware::{Middleware, Next};
use crate::transport::Transport;
use crate::types::{Request, Response};
use hermes_core::HermesResult;
use std::sync::Arc;

/// A type-erased middleware that can be stored in a vector.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// An immutable, ordered list of stages.
///
/// # Example
///
/// ```
/// use hermes_middleware::pipeline::Pipeline;
/// use hermes_middleware::stages::{RequestLoggingMiddleware, ResponseLoggingMiddleware};
///
/// let pipeline = Pipeline::builder()
///     .add_stage(RequestLoggingMiddleware::new())
///     .add_stage(ResponseLoggingMiddleware::new())
///     .build();
///
/// assert_eq!(pipeline.stage_names(), vec!["request_logging", "response_logging"]);
/// ```
#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Vec<BoxedMiddleware>,
}

impl Pipeline {
    /// Creates a new pipeline builder.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Runs a request through every stage and then the transport.
    ///
    /// # Errors
    ///
    /// Returns the transport error, or an error raised by a stage.
    pub async fn process(
        &self,
        ctx: &mut ExchangeContext,
        request: Request,
        transport: &dyn Transport,
    ) -> HermesResult<Response> {
        let next = self.build_chain(transport);
        next.run(ctx, request).await
    }

    fn build_chain<'a>(&'a self, transport: &'a dyn Transport) -> Next<'a> {
        let mut next = Next::transport(transport);
        for middleware in self.stages.iter().rev() {
            next = Next::new(middleware.as_ref(), next);
        }
        next
    }

    /// Returns the names of all stages in order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|mw| mw.name()).collect()
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

/// Builder for constructing a [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    stages: Vec<BoxedMiddleware>,
}

impl PipelineBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage. Earlier stages wrap later ones.
    #[must_use]
    pub fn add_stage<M: Middleware>(mut self, middleware: M) -> Self {
        self.stages.push(Arc::new(middleware));
        self
    }

    /// Appends an already shared stage.
    #[must_use]
    pub fn add_shared(mut self, middleware: BoxedMiddleware) -> Self {
        self.stages.push(middleware);
        self
    }

    /// Appends a stage only when `enabled` is true.
    #[must_use]
    pub fn add_stage_if<M: Middleware>(self, enabled: bool, middleware: M) -> Self {
        if enabled {
            self.add_stage(middleware)
        } else {
            self
        }
    }

    /// Builds the pipeline.
    #[must_use]
    pub fn build(self) -> Pipeline {
        Pipeline {
            stages: self.stages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::BoxFuture;
    use crate::transport::FnTransport;
    use bytes::Bytes;
    use hermes_core::HermesError;
    use http::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Records the order in which stages see the request and the result.
    struct OrderTrackingMiddleware {
        name: &'static str,
        counter: Arc<AtomicUsize>,
        order: Arc<Mutex<Vec<String>>>,
    }

    impl Middleware for OrderTrackingMiddleware {
        fn name(&self) -> &'static str {
            self.name
        }

        fn process<'a>(
            &'a self,
            ctx: &'a mut ExchangeContext,
            request: Request,
            next: Next<'a>,
        ) -> BoxFuture<'a, HermesResult<Response>> {
            Box::pin(async move {
                self.counter.fetch_add(1, Ordering::SeqCst);
                self.order.lock().unwrap().push(format!("{}:in", self.name));
                let result = next.run(ctx, request).await;
                self.order.lock().unwrap().push(format!("{}:out", self.name));
                result
            })
        }
    }

    fn tracker(
        name: &'static str,
        counter: &Arc<AtomicUsize>,
        order: &Arc<Mutex<Vec<String>>>,
    ) -> OrderTrackingMiddleware {
        OrderTrackingMiddleware {
            name,
            counter: counter.clone(),
            order: order.clone(),
        }
    }

    fn ok_transport() -> FnTransport {
        FnTransport::new(|_| {
            let mut response = Response::new(Bytes::from_static(b"OK"));
            *response.status_mut() = StatusCode::OK;
            Ok(response)
        })
    }

    #[tokio::test]
    async fn test_pipeline_executes_in_order() {
        let counter = Arc::new(AtomicUsize::new(0));
        let order = Arc::new(Mutex::new(Vec::new()));

        let pipeline = Pipeline::builder()
            .add_stage(tracker("first", &counter, &order))
            .add_stage(tracker("second", &counter, &order))
            .add_stage(tracker("third", &counter, &order))
            .build();

        let mut ctx = ExchangeContext::new();
        let response = pipeline
            .process(&mut ctx, Request::new(Bytes::new()), &ok_transport())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert_eq!(
            *order.lock().unwrap(),
            vec!["first:in", "second:in", "third:in", "third:out", "second:out", "first:out"]
        );
    }

    #[tokio::test]
    async fn test_empty_pipeline() {
        let pipeline = Pipeline::builder().build();
        let mut ctx = ExchangeContext::new();

        let response = pipeline
            .process(&mut ctx, Request::new(Bytes::new()), &ok_transport())
            .await
            .unwrap();

        assert_eq!(response.body().as_ref(), b"OK");
        assert_eq!(pipeline.stage_count(), 0);
    }

    #[tokio::test]
    async fn test_transport_error_passes_through_stages() {
        let counter = Arc::new(AtomicUsize::new(0));
        let order = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::builder()
            .add_stage(tracker("only", &counter, &order))
            .build();
        let failing = FnTransport::new(|_| Err(HermesError::timeout("http://host/api/user", 10)));

        let mut ctx = ExchangeContext::new();
        let err = pipeline
            .process(&mut ctx, Request::new(Bytes::new()), &failing)
            .await
            .unwrap_err();

        assert!(matches!(err, HermesError::Timeout { timeout_ms: 10, .. }));
        assert_eq!(*order.lock().unwrap(), vec!["only:in", "only:out"]);
    }

    #[test]
    fn test_add_stage_if() {
        let counter = Arc::new(AtomicUsize::new(0));
        let order = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::builder()
            .add_stage_if(false, tracker("skipped", &counter, &order))
            .add_stage_if(true, tracker("kept", &counter, &order))
            .build();

        assert_eq!(pipeline.stage_names(), vec!["kept"]);
    }
}
