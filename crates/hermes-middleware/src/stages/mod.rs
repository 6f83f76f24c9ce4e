//! Built-in pipeline stages.
//!
//! The default client pipeline installs them in this order (outermost
//! first):
//!
//! 1. [`request_log`] - structured event per outgoing request
//! 2. [`response_log`] - structured event per response or transport error
//! 3. [`interaction_log`] - templated request/response block to a sink

pub mod interaction_log;
pub mod request_log;
pub mod response_log;

pub use interaction_log::InteractionLogMiddleware;
pub use request_log::RequestLoggingMiddleware;
pub use response_log::ResponseLoggingMiddleware;
