//! Resource identifier objects.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A `(type, id)` pair referencing a resource without its attributes.
///
/// Identifiers compare and hash by value, so they can be used directly as
/// lookup keys.
///
/// # Example
///
/// ```rust
/// use jsonapi_provider::ResourceIdentifier;
///
/// let a = ResourceIdentifier::new("notes", "12");
/// let b: ResourceIdentifier = serde_json::from_str(r#"{"type":"notes","id":"12"}"#).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "notes:12");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    /// The resource type.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// The server-assigned identifier.
    pub id: String,
}

impl ResourceIdentifier {
    /// Creates a new identifier.
    #[must_use]
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Returns `true` if this identifier refers to `(resource_type, id)`.
    #[must_use]
    pub fn matches(&self, resource_type: &str, id: &str) -> bool {
        self.resource_type == resource_type && self.id == id
    }
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource_type, self.id)
    }
}
