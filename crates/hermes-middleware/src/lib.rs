//! # Hermes Middleware
//!
//! The path every harness request takes to the network.
//!
//! A [`Pipeline`] is an ordered list of [`Middleware`] stages composed around
//! a [`Transport`]. The harness installs logging stages; tests can add their
//! own.
//!
//! ```text
//! ApiClient ─▶ RequestLogging ─▶ ResponseLogging ─▶ InteractionLog ─▶ Transport ─▶ network
//! ```
//!
//! ## Example
//!
//! ```
//! use bytes::Bytes;
//! use hermes_middleware::{ExchangeContext, FnTransport, Pipeline, Request, Response};
//! use hermes_middleware::stages::ResponseLoggingMiddleware;
//!
//! # tokio_test::block_on(async {
//! let pipeline = Pipeline::builder()
//!     .add_stage(ResponseLoggingMiddleware::new())
//!     .build();
//! let transport = FnTransport::new(|_| Ok(Response::new(Bytes::from_static(b"[]"))));
//!
//! let mut ctx = ExchangeContext::new();
//! let response = pipeline
//!     .process(&mut ctx, Request::new(Bytes::new()), &transport)
//!     .await
//!     .unwrap();
//! assert_eq!(response.body().as_ref(), b"[]");
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod context;
pub mod middleware;
pub mod pipeline;
pub mod stages;
pub mod transport;
pub mod types;

// Re-export main types at crate root
pub use context::ExchangeContext;
pub use middleware::{BoxFuture, FnMiddleware, Middleware, Next};
pub use pipeline::{BoxedMiddleware, Pipeline, PipelineBuilder};
pub use transport::{FnTransport, ReqwestTransport, Transport};
pub use types::{Request, Response, ResponseExt};
