//! Condition failure type.

use thiserror::Error;

/// A condition did not hold for a response.
///
/// Carries the name of the condition that failed and a human-readable
/// diagnostic (`expected status 201, got 400`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{condition}: {diagnostic}")]
pub struct ConditionError {
    condition: String,
    diagnostic: String,
}

impl ConditionError {
    /// Creates a condition error.
    pub fn new(condition: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self {
            condition: condition.into(),
            diagnostic: diagnostic.into(),
        }
    }

    /// Name of the failed condition.
    #[must_use]
    pub fn condition(&self) -> &str {
        &self.condition
    }

    /// What was expected and what was found.
    #[must_use]
    pub fn diagnostic(&self) -> &str {
        &self.diagnostic
    }
}
