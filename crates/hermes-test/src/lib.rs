//! # Hermes Test
//!
//! Fluent response validation for end-to-end API tests.
//!
//! An [`ApiClient`] sends requests through the logging pipeline and wraps
//! each completed exchange in a [`ValidatableResponse`]. Assertions are
//! [`Condition`]s chained with [`should`](ValidatableResponse::should);
//! typed values come out through the extractors.
//!
//! ## Example
//!
//! ```no_run
//! use hermes_test::conditions::{has_message, has_status_code};
//! use hermes_test::ApiClient;
//! use serde_json::json;
//!
//! # async fn run() -> hermes_core::HermesResult<()> {
//! let client = ApiClient::shared()?;
//!
//! client
//!     .post("/api/signup")
//!     .accept("application/json")
//!     .json(&json!({"login": "newTestUser42", "pass": "newPassword"}))
//!     .send()
//!     .await?
//!     .should(has_status_code(201))
//!     .should(has_message("User created"));
//!
//! let token = client
//!     .post("/api/login")
//!     .json(&json!({"login": "newTestUser42", "password": "newPassword"}))
//!     .send()
//!     .await?
//!     .should(has_status_code(200))
//!     .as_jwt()?;
//! # let _ = token;
//! # Ok(())
//! # }
//! ```
//!
//! ## Failures
//!
//! | Failure | Surfaces as |
//! |---|---|
//! | No response (connection, timeout) | `HermesError` from `send` |
//! | Response of the wrong shape | `HermesError` from the extractor |
//! | Condition does not hold | panic from `should`, `ConditionError` from `try_should` |
//! | 4xx/5xx status | a normal response |

#![doc(html_root_url = "https://docs.rs/hermes-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod condition;
pub mod conditions;
mod error;
mod request;
mod response;

pub use client::{ApiClient, CONFIG_FILE};
pub use condition::Condition;
pub use error::ConditionError;
pub use request::{ApiRequest, APPLICATION_JSON};
pub use response::ValidatableResponse;
