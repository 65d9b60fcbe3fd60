//! Runtime resource schemas.
//!
//! A [`SchemaRegistry`] declares, per resource type, which attributes and
//! relationships exist, the cardinality of every relationship, and which
//! members may be written. When a registry is configured on a provider,
//! requests are validated before serialization and responses before they are
//! returned.
//!
//! # Overview
//!
//! - [`SchemaRegistry`]: resource schemas keyed by type
//! - [`ResourceSchema`]: attributes and relationships of one type
//! - [`RelationshipSchema`]: target type, [`Cardinality`], mutability
//! - [`SchemaError`]: validation failures
//!
//! # Example
//!
//! ```rust
//! use jsonapi_provider::schema::{RelationshipSchema, ResourceSchema, SchemaRegistry};
//!
//! let registry = SchemaRegistry::new()
//!     .with(
//!         "notes",
//!         ResourceSchema::new()
//!             .attribute("title")
//!             .read_only_attribute("created")
//!             .relationship("author", RelationshipSchema::single("people"))
//!             .relationship("tags", RelationshipSchema::multiple("tags")),
//!     )
//!     .with("people", ResourceSchema::new().attribute("name"))
//!     .with("tags", ResourceSchema::new().attribute("name"));
//!
//! assert!(registry.get("notes").is_some());
//! assert!(registry.get("comments").is_none());
//! ```
//!
//! Registries are plain data and can also be loaded from JSON:
//!
//! ```rust
//! use jsonapi_provider::schema::{Cardinality, SchemaRegistry};
//!
//! let registry: SchemaRegistry = serde_json::from_str(r#"{
//!     "notes": {
//!         "attributes": { "title": {}, "created": { "mutable": false } },
//!         "relationships": {
//!             "author": { "target": "people", "cardinality": "nullable" }
//!         }
//!     },
//!     "people": {}
//! }"#).unwrap();
//!
//! let author = registry.get("notes").unwrap().get_relationship("author").unwrap();
//! assert_eq!(author.cardinality, Cardinality::Nullable);
//! ```

mod errors;
mod validate;

pub use errors::SchemaError;
pub use validate::{validate_query, validate_resource, validate_response, WriteMode};

pub(crate) use validate::validate_linkage;

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// How many identifiers a relationship holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    /// Exactly one identifier.
    Single,
    /// One identifier or `null`.
    Nullable,
    /// A list of identifiers.
    Multiple,
}

impl Cardinality {
    /// Returns `true` for to-many relationships.
    #[must_use]
    pub const fn is_many(self) -> bool {
        matches!(self, Self::Multiple)
    }

    /// Returns the lowercase name used in messages and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Nullable => "nullable",
            Self::Multiple => "multiple",
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const fn writable() -> bool {
    true
}

/// Declaration of one attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSchema {
    /// Whether updates may write the attribute.
    #[serde(default = "writable")]
    pub mutable: bool,
}

impl Default for AttributeSchema {
    fn default() -> Self {
        Self { mutable: true }
    }
}

/// Declaration of one relationship.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipSchema {
    /// The resource type every identifier must have.
    pub target: String,
    /// How many identifiers the relationship holds.
    pub cardinality: Cardinality,
    /// Whether writes may change the relationship.
    #[serde(default = "writable")]
    pub mutable: bool,
}

impl RelationshipSchema {
    /// A to-one relationship that is never `null`.
    #[must_use]
    pub fn single(target: impl Into<String>) -> Self {
        Self::with_cardinality(target, Cardinality::Single)
    }

    /// A to-one relationship that may be `null`.
    #[must_use]
    pub fn nullable(target: impl Into<String>) -> Self {
        Self::with_cardinality(target, Cardinality::Nullable)
    }

    /// A to-many relationship.
    #[must_use]
    pub fn multiple(target: impl Into<String>) -> Self {
        Self::with_cardinality(target, Cardinality::Multiple)
    }

    /// Marks the relationship read-only.
    #[must_use]
    pub const fn read_only(mut self) -> Self {
        self.mutable = false;
        self
    }

    fn with_cardinality(target: impl Into<String>, cardinality: Cardinality) -> Self {
        Self {
            target: target.into(),
            cardinality,
            mutable: true,
        }
    }
}

/// The attributes and relationships of one resource type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSchema {
    /// Declared attributes.
    #[serde(default)]
    pub attributes: IndexMap<String, AttributeSchema>,
    /// Declared relationships.
    #[serde(default)]
    pub relationships: IndexMap<String, RelationshipSchema>,
}

impl ResourceSchema {
    /// Creates a schema with no members.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a writable attribute.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes
            .insert(name.into(), AttributeSchema { mutable: true });
        self
    }

    /// Declares an attribute that can be set on creation but not updated.
    #[must_use]
    pub fn read_only_attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes
            .insert(name.into(), AttributeSchema { mutable: false });
        self
    }

    /// Declares a relationship.
    #[must_use]
    pub fn relationship(mut self, name: impl Into<String>, schema: RelationshipSchema) -> Self {
        self.relationships.insert(name.into(), schema);
        self
    }

    /// Returns the named attribute's declaration.
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&AttributeSchema> {
        self.attributes.get(name)
    }

    /// Returns the named relationship's declaration.
    #[must_use]
    pub fn get_relationship(&self, name: &str) -> Option<&RelationshipSchema> {
        self.relationships.get(name)
    }

    /// Returns `true` if `name` is a declared attribute or relationship.
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.attributes.contains_key(name) || self.relationships.contains_key(name)
    }
}

/// Resource schemas keyed by resource type.
///
/// A registry is immutable once handed to a provider and is shared between
/// clones of the provider configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaRegistry {
    types: IndexMap<String, ResourceSchema>,
}

// Verify SchemaRegistry is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SchemaRegistry>();
};

impl SchemaRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `schema` for `resource_type`, returning the registry.
    #[must_use]
    pub fn with(mut self, resource_type: impl Into<String>, schema: ResourceSchema) -> Self {
        self.register(resource_type, schema);
        self
    }

    /// Registers `schema` for `resource_type`, replacing any earlier schema.
    pub fn register(&mut self, resource_type: impl Into<String>, schema: ResourceSchema) {
        self.types.insert(resource_type.into(), schema);
    }

    /// Returns the schema for `resource_type`, if registered.
    #[must_use]
    pub fn get(&self, resource_type: &str) -> Option<&ResourceSchema> {
        self.types.get(resource_type)
    }

    /// Returns the schema for `resource_type`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownType`] if the type is not registered.
    pub fn resource(&self, resource_type: &str) -> Result<&ResourceSchema, SchemaError> {
        self.get(resource_type)
            .ok_or_else(|| SchemaError::UnknownType {
                resource_type: resource_type.to_string(),
            })
    }

    /// Returns the declaration of `resource_type.relationship`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownType`] or
    /// [`SchemaError::UnknownRelationship`].
    pub fn relationship(
        &self,
        resource_type: &str,
        relationship: &str,
    ) -> Result<&RelationshipSchema, SchemaError> {
        self.resource(resource_type)?
            .get_relationship(relationship)
            .ok_or_else(|| SchemaError::UnknownRelationship {
                resource_type: resource_type.to_string(),
                relationship: relationship.to_string(),
            })
    }

    /// Iterates over registered types in registration order.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}
