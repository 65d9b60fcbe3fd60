//! Schema validation error types.
//!
//! A [`SchemaError`] means a request or response does not agree with the
//! configured [`SchemaRegistry`](crate::schema::SchemaRegistry). Errors are
//! raised before anything is serialized for requests, and before a document
//! is handed back for responses.
//!
//! # Example
//!
//! ```rust
//! use jsonapi_provider::schema::SchemaError;
//!
//! let error = SchemaError::UnknownRelationship {
//!     resource_type: "notes".to_string(),
//!     relationship: "owner".to_string(),
//! };
//! assert!(error.to_string().contains("owner"));
//! ```

use thiserror::Error;

use crate::schema::Cardinality;

/// Errors raised when validating against a schema registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The resource type is not registered.
    #[error("Unknown resource type '{resource_type}'")]
    UnknownType {
        /// The unregistered type.
        resource_type: String,
    },

    /// The attribute is not declared for the resource type.
    #[error("Resource type '{resource_type}' has no attribute '{attribute}'")]
    UnknownAttribute {
        /// The resource type.
        resource_type: String,
        /// The undeclared attribute.
        attribute: String,
    },

    /// The relationship is not declared for the resource type.
    #[error("Resource type '{resource_type}' has no relationship '{relationship}'")]
    UnknownRelationship {
        /// The resource type.
        resource_type: String,
        /// The undeclared relationship.
        relationship: String,
    },

    /// A sparse fieldset names a field the resource type does not declare.
    #[error("Sparse fieldset for '{resource_type}' names unknown field '{field}'")]
    UnknownField {
        /// The resource type of the fieldset.
        resource_type: String,
        /// The unknown field.
        field: String,
    },

    /// Relationship linkage does not match the declared cardinality.
    #[error("Relationship '{resource_type}.{relationship}' is {expected} but linkage is {found}")]
    CardinalityMismatch {
        /// The resource type owning the relationship.
        resource_type: String,
        /// The relationship name.
        relationship: String,
        /// The declared cardinality.
        expected: Cardinality,
        /// A description of the linkage that was found.
        found: &'static str,
    },

    /// A relationship identifier points at the wrong resource type.
    #[error("Relationship '{relationship}' targets '{expected}' but identifier has type '{found}'")]
    TargetTypeMismatch {
        /// The relationship name.
        relationship: String,
        /// The declared target type.
        expected: String,
        /// The identifier's type.
        found: String,
    },

    /// An update writes an attribute declared read-only.
    #[error("Attribute '{resource_type}.{attribute}' is read-only")]
    ImmutableAttribute {
        /// The resource type.
        resource_type: String,
        /// The read-only attribute.
        attribute: String,
    },

    /// A write targets a relationship declared read-only.
    #[error("Relationship '{resource_type}.{relationship}' is read-only")]
    ImmutableRelationship {
        /// The resource type.
        resource_type: String,
        /// The read-only relationship.
        relationship: String,
    },

    /// Members can only be added to or removed from to-many relationships.
    #[error("Relationship '{resource_type}.{relationship}' is to-one; members can only be added to or removed from to-many relationships")]
    ToManyOnly {
        /// The resource type.
        resource_type: String,
        /// The to-one relationship.
        relationship: String,
    },

    /// A sort criterion names a field the resource type cannot be sorted by.
    #[error("Cannot sort '{resource_type}' by '{field}'")]
    InvalidSortField {
        /// The primary resource type.
        resource_type: String,
        /// The sort field as given.
        field: String,
    },

    /// An include path does not follow declared relationships.
    #[error("Include path '{path}' is not reachable from '{resource_type}'")]
    InvalidIncludePath {
        /// The primary resource type.
        resource_type: String,
        /// The dot-joined path.
        path: String,
    },

    /// A request body's resource type differs from the addressed type.
    #[error("Expected a resource of type '{expected}', found '{found}'")]
    TypeMismatch {
        /// The addressed type.
        expected: String,
        /// The body's type.
        found: String,
    },

    /// A request body's resource id differs from the addressed id.
    #[error("Expected a resource with id '{expected}', found '{found}'")]
    IdMismatch {
        /// The addressed id.
        expected: String,
        /// The body's id.
        found: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinality_mismatch_message_names_both_sides() {
        let error = SchemaError::CardinalityMismatch {
            resource_type: "notes".to_string(),
            relationship: "author".to_string(),
            expected: Cardinality::Single,
            found: "a list",
        };
        let message = error.to_string();

        assert!(message.contains("notes.author"));
        assert!(message.contains("single"));
        assert!(message.contains("a list"));
    }

    #[test]
    fn test_to_many_only_message() {
        let error = SchemaError::ToManyOnly {
            resource_type: "notes".to_string(),
            relationship: "author".to_string(),
        };
        assert!(error.to_string().contains("to-one"));
    }
}
