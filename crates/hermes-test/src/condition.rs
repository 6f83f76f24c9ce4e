//! The condition trait.

use crate::error::ConditionError;
use crate::response::ValidatableResponse;

/// A reusable predicate over a completed response.
///
/// Implement it on a type, or pass a closure: any
/// `Fn(&ValidatableResponse) -> Result<(), ConditionError>` is a condition.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use hermes_test::{ConditionError, ValidatableResponse};
/// use http::{HeaderMap, StatusCode};
///
/// let fast = |r: &ValidatableResponse| -> Result<(), ConditionError> {
///     if r.elapsed().as_secs() < 2 {
///         Ok(())
///     } else {
///         Err(ConditionError::new("fast", format!("took {:?}", r.elapsed())))
///     }
/// };
///
/// let response = ValidatableResponse::new(StatusCode::OK, HeaderMap::new(), Bytes::new());
/// response.should(fast);
/// ```
pub trait Condition {
    /// Returns `Ok(())` when the condition holds for `response`.
    fn check(&self, response: &ValidatableResponse) -> Result<(), ConditionError>;
}

impl<F> Condition for F
where
    F: Fn(&ValidatableResponse) -> Result<(), ConditionError>,
{
    fn check(&self, response: &ValidatableResponse) -> Result<(), ConditionError> {
        self(response)
    }
}
