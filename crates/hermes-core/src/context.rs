//! Exchange identifiers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unique identifier for each HTTP exchange, using UUID v7.
///
/// UUID v7 is time-ordered, so interaction log blocks sort by issue time
/// when grepped by ID.
///
/// # Example
///
/// ```
/// use hermes_core::RequestId;
///
/// let id = RequestId::new();
/// println!("Request ID: {}", id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID using UUID v7.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `RequestId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_are_unique() {
        let a = RequestId::new();
        let b = RequestId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_request_id_roundtrips_uuid() {
        let uuid = Uuid::now_v7();
        let id = RequestId::from_uuid(uuid);
        assert_eq!(id.as_uuid(), &uuid);
        assert_eq!(id.to_string(), uuid.to_string());
    }
}
