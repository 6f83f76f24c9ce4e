//! # Hermes Core
//!
//! Core types shared by every Hermes crate:
//!
//! - [`HermesError`] / [`HermesResult`] - the error surfaced by harness calls
//! - [`RequestId`] - UUID v7 identifier attached to each HTTP exchange

#![doc(html_root_url = "https://docs.rs/hermes-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;

pub use context::RequestId;
pub use error::{HermesError, HermesResult};
