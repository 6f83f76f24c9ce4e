//! Built-in conditions.
//!
//! Every factory returns a plain value implementing [`Condition`], so
//! conditions can be stored, reused and combined.
//!
//! ```
//! use bytes::Bytes;
//! use hermes_test::conditions::{all_of, has_message, has_status_code};
//! use hermes_test::ValidatableResponse;
//! use http::{HeaderMap, StatusCode};
//!
//! let created = all_of()
//!     .and(has_status_code(201))
//!     .and(has_message("User created"));
//!
//! let response = ValidatableResponse::new(
//!     StatusCode::CREATED,
//!     HeaderMap::new(),
//!     Bytes::from_static(br#"{"info":{"message":"User created","status":"success"}}"#),
//! );
//! response.should(created);
//! ```

use crate::condition::Condition;
use crate::error::ConditionError;
use crate::response::{InfoMessage, ValidatableResponse};
use serde_json::Value;

const ABSENT: &str = "<absent>";

/// Status code equals the expected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HasStatusCode {
    expected: u16,
}

/// Creates a [`HasStatusCode`] condition.
#[must_use]
pub const fn has_status_code(expected: u16) -> HasStatusCode {
    HasStatusCode { expected }
}

impl Condition for HasStatusCode {
    fn check(&self, response: &ValidatableResponse) -> Result<(), ConditionError> {
        let actual = response.status_code();
        if actual == self.expected {
            Ok(())
        } else {
            Err(ConditionError::new(
                "has_status_code",
                format!("expected status {}, got {actual}", self.expected),
            ))
        }
    }
}

/// The `info.message` of the envelope equals the expected text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasMessage {
    expected: String,
}

/// Creates a [`HasMessage`] condition.
pub fn has_message(expected: impl Into<String>) -> HasMessage {
    HasMessage {
        expected: expected.into(),
    }
}

impl Condition for HasMessage {
    fn check(&self, response: &ValidatableResponse) -> Result<(), ConditionError> {
        let actual = response
            .get_object::<InfoMessage>("info")
            .ok()
            .map(|info| info.message);
        if actual.as_deref() == Some(self.expected.as_str()) {
            return Ok(());
        }
        Err(ConditionError::new(
            "has_message",
            format!(
                "expected info.message '{}', got '{}'",
                self.expected,
                actual.as_deref().unwrap_or(ABSENT)
            ),
        ))
    }
}

/// A header is present with exactly the expected value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasHeader {
    name: String,
    expected: String,
}

/// Creates a [`HasHeader`] condition.
pub fn has_header(name: impl Into<String>, expected: impl Into<String>) -> HasHeader {
    HasHeader {
        name: name.into(),
        expected: expected.into(),
    }
}

impl Condition for HasHeader {
    fn check(&self, response: &ValidatableResponse) -> Result<(), ConditionError> {
        match response.header(&self.name) {
            Some(actual) if actual == self.expected => Ok(()),
            actual => Err(ConditionError::new(
                "has_header",
                format!(
                    "expected header '{}' to be '{}', got '{}'",
                    self.name,
                    self.expected,
                    actual.unwrap_or(ABSENT)
                ),
            )),
        }
    }
}

/// `Content-Type` names the expected media type.
///
/// Parameters such as `; charset=utf-8` are ignored and the comparison is
/// case-insensitive, but the media type itself must match exactly:
/// `application/json` does not accept `application/json-patch+json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasContentType {
    expected: String,
}

/// Creates a [`HasContentType`] condition.
pub fn has_content_type(expected: impl Into<String>) -> HasContentType {
    HasContentType {
        expected: expected.into(),
    }
}

impl Condition for HasContentType {
    fn check(&self, response: &ValidatableResponse) -> Result<(), ConditionError> {
        let actual = response.header(http::header::CONTENT_TYPE.as_str());
        match actual {
            Some(value) if media_type(value).eq_ignore_ascii_case(media_type(&self.expected)) => {
                Ok(())
            }
            _ => Err(ConditionError::new(
                "has_content_type",
                format!(
                    "expected content type '{}', got '{}'",
                    self.expected,
                    actual.unwrap_or(ABSENT)
                ),
            )),
        }
    }
}

fn media_type(value: &str) -> &str {
    value.split(';').next().unwrap_or_default().trim()
}

/// The JSON body has a non-null value at the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasJsonPath {
    path: String,
}

/// Creates a [`HasJsonPath`] condition.
pub fn has_json_path(path: impl Into<String>) -> HasJsonPath {
    HasJsonPath { path: path.into() }
}

impl Condition for HasJsonPath {
    fn check(&self, response: &ValidatableResponse) -> Result<(), ConditionError> {
        match response.json_path(&self.path) {
            Ok(Value::Null) => Err(ConditionError::new(
                "has_json_path",
                format!("expected a value at '{}', found none", self.path),
            )),
            Ok(_) => Ok(()),
            Err(err) => Err(ConditionError::new("has_json_path", err.to_string())),
        }
    }
}

/// Status is 2xx.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsSuccess;

/// Creates an [`IsSuccess`] condition.
#[must_use]
pub const fn is_success() -> IsSuccess {
    IsSuccess
}

impl Condition for IsSuccess {
    fn check(&self, response: &ValidatableResponse) -> Result<(), ConditionError> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(ConditionError::new(
                "is_success",
                format!("expected a 2xx status, got {}", response.status_code()),
            ))
        }
    }
}

/// Every member holds; the first failure is reported.
#[derive(Default)]
pub struct AllOf {
    conditions: Vec<Box<dyn Condition + Send + Sync>>,
}

/// Creates an empty [`AllOf`]; add members with [`AllOf::and`].
#[must_use]
pub fn all_of() -> AllOf {
    AllOf::default()
}

impl AllOf {
    /// Appends a condition.
    pub fn and<C>(mut self, condition: C) -> Self
    where
        C: Condition + Send + Sync + 'static,
    {
        self.conditions.push(Box::new(condition));
        self
    }

    /// Number of member conditions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// True when there are no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl Condition for AllOf {
    fn check(&self, response: &ValidatableResponse) -> Result<(), ConditionError> {
        self.conditions
            .iter()
            .try_for_each(|condition| condition.check(response))
    }
}

impl std::fmt::Debug for AllOf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AllOf")
            .field("conditions", &self.conditions.len())
            .finish()
    }
}
