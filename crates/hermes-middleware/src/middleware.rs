//! Core middleware trait and types.
//!
//! This module defines the [`Middleware`] trait that every stage wrapped
//! around the transport implements. A stage sees the outgoing request before
//! the transport does and the result (response or transport error) after.
//!
//! # Example
//!
//! ```
//! use hermes_core::HermesResult;
//! use hermes_middleware::{BoxFuture, ExchangeContext, Middleware, Next, Request, Response};
//!
//! struct Timing;
//!
//! impl Middleware for Timing {
//!     fn name(&self) -> &'static str {
//!         "timing"
//!     }
//!
//!     fn process<'a>(
//!         &'a self,
//!         ctx: &'a mut ExchangeContext,
//!         request: Request,
//!         next: Next<'a>,
//!     ) -> BoxFuture<'a, HermesResult<Response>> {
//!         Box::pin(async move {
//!             let result = next.run(ctx, request).await;
//!             println!("took {:?}", ctx.elapsed());
//!             result
//!         })
//!     }
//! }
//! ```

use crate::context::ExchangeContext;
use crate::transport::Transport;
use crate::types::{Request, Response};
use hermes_core::HermesResult;
use std::future::Future;
use std::pin::Pin;

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A stage in the pipeline around the transport.
///
/// # Invariants
///
/// - A stage MUST call `next.run()` exactly once (unless short-circuiting)
/// - A stage MUST return the downstream result unchanged unless its purpose
///   is to change it; logging stages never do
pub trait Middleware: Send + Sync + 'static {
    /// Returns the unique name of this stage.
    fn name(&self) -> &'static str;

    /// Processes the request through this stage.
    fn process<'a>(
        &'a self,
        ctx: &'a mut ExchangeContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, HermesResult<Response>>;
}

/// The rest of the pipeline.
///
/// Consumed by [`Next::run`], so it can only be invoked once.
pub struct Next<'a> {
    inner: NextInner<'a>,
}

enum NextInner<'a> {
    /// More stages to run.
    Chain {
        middleware: &'a dyn Middleware,
        next: Box<Next<'a>>,
    },
    /// End of chain: hand the request to the transport.
    Transport(&'a dyn Transport),
}

impl<'a> Next<'a> {
    /// Creates a `Next` that will invoke the given stage.
    pub(crate) fn new(middleware: &'a dyn Middleware, next: Next<'a>) -> Self {
        Self {
            inner: NextInner::Chain {
                middleware,
                next: Box::new(next),
            },
        }
    }

    /// Creates a terminal `Next` that sends the request.
    #[must_use]
    pub fn transport(transport: &'a dyn Transport) -> Self {
        Self {
            inner: NextInner::Transport(transport),
        }
    }

    /// Invokes the next stage, or the transport at the end of the chain.
    ///
    /// # Errors
    ///
    /// Returns whatever the downstream stage or transport returns.
    pub async fn run(self, ctx: &mut ExchangeContext, request: Request) -> HermesResult<Response> {
        match self.inner {
            NextInner::Chain { middleware, next } => middleware.process(ctx, request, *next).await,
            NextInner::Transport(transport) => transport.execute(request).await,
        }
    }
}

/// A middleware built from a closure.
///
/// # Example
///
/// ```
/// use hermes_middleware::FnMiddleware;
///
/// let passthrough = FnMiddleware::new("passthrough", |ctx, request, next| {
///     Box::pin(async move { next.run(ctx, request).await })
/// });
/// ```
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut ExchangeContext, Request, Next<'a>) -> BoxFuture<'a, HermesResult<Response>>
        + Send
        + Sync
        + 'static,
{
    /// Creates a new function-based middleware.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut ExchangeContext, Request, Next<'a>) -> BoxFuture<'a, HermesResult<Response>>
        + Send
        + Sync
        + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut ExchangeContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, HermesResult<Response>> {
        (self.func)(ctx, request, next)
    }
}
