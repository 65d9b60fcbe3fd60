//! Resource objects, relationships, and links.
//!
//! A [`Resource`] is a typed, identified record with attributes and named
//! relationships. Attribute and relationship maps are [`IndexMap`]s so that
//! serialization order follows insertion order, which keeps request bodies
//! byte-stable across runs.

use indexmap::IndexMap;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ResourceIdentifier;

/// Free-form `meta` member.
pub type Meta = serde_json::Map<String, Value>;

/// A `links` member, keyed by relation name (`self`, `related`, `next`, ...).
pub type Links = IndexMap<String, Link>;

/// A single link: either a bare URL or a link object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Link {
    /// A bare URL string.
    Href(String),
    /// A link object with an `href` and optional `meta`.
    Object {
        /// The link target.
        href: String,
        /// Non-standard information about the link.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        meta: Option<Meta>,
    },
}

impl Link {
    /// Returns the link target regardless of representation.
    #[must_use]
    pub fn href(&self) -> &str {
        match self {
            Self::Href(href) | Self::Object { href, .. } => href,
        }
    }
}

/// The `data` member of a relationship.
///
/// To-one relationships carry an identifier or `null`; to-many relationships
/// carry a (possibly empty) list. A to-one relationship never carries an array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationshipData {
    /// A to-many linkage.
    Many(Vec<ResourceIdentifier>),
    /// A to-one linkage, `None` when the relationship is empty.
    One(Option<ResourceIdentifier>),
}

impl RelationshipData {
    /// Returns `true` for to-many linkage.
    #[must_use]
    pub const fn is_many(&self) -> bool {
        matches!(self, Self::Many(_))
    }

    /// Returns `true` for an empty to-one linkage (`null`).
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::One(None))
    }

    /// Returns every identifier referenced by this linkage, in order.
    #[must_use]
    pub fn identifiers(&self) -> &[ResourceIdentifier] {
        match self {
            Self::Many(identifiers) => identifiers,
            Self::One(Some(identifier)) => std::slice::from_ref(identifier),
            Self::One(None) => &[],
        }
    }
}

impl Default for RelationshipData {
    fn default() -> Self {
        Self::One(None)
    }
}

impl From<ResourceIdentifier> for RelationshipData {
    fn from(identifier: ResourceIdentifier) -> Self {
        Self::One(Some(identifier))
    }
}

impl From<Option<ResourceIdentifier>> for RelationshipData {
    fn from(identifier: Option<ResourceIdentifier>) -> Self {
        Self::One(identifier)
    }
}

impl From<Vec<ResourceIdentifier>> for RelationshipData {
    fn from(identifiers: Vec<ResourceIdentifier>) -> Self {
        Self::Many(identifiers)
    }
}

/// A named relationship of a resource.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Resource linkage. A missing `data` member reads as `null`.
    #[serde(default)]
    pub data: RelationshipData,
    /// Relationship links (`self`, `related`, pagination links for to-many).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    /// Non-standard information about the relationship.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl Relationship {
    /// Creates a relationship carrying only linkage data.
    #[must_use]
    pub fn new(data: impl Into<RelationshipData>) -> Self {
        Self {
            data: data.into(),
            links: None,
            meta: None,
        }
    }
}

/// A resource object.
///
/// Resources that have not been persisted yet carry a client-generated local
/// identifier (`lid`) instead of an `id`. The server assigns `id` on creation.
///
/// # Example
///
/// ```rust
/// use jsonapi_provider::{Resource, ResourceIdentifier};
/// use serde_json::json;
///
/// let note = Resource::new("notes")
///     .with_attribute("title", json!("Groceries"))
///     .with_relationship("author", ResourceIdentifier::new("people", "9"));
///
/// assert!(note.id.is_none());
/// assert!(note.lid.is_some());
/// assert_eq!(note.attributes["title"], json!("Groceries"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// The resource type.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// The server-assigned identifier, absent before creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The client-generated local identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lid: Option<String>,
    /// Attribute values keyed by attribute name.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, Value>,
    /// Relationships keyed by relationship name.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub relationships: IndexMap<String, Relationship>,
    /// Resource links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    /// Non-standard information about the resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl Resource {
    /// Length of generated local identifiers.
    pub const LID_LENGTH: usize = 16;

    /// Creates an unsaved resource with a random local identifier.
    #[must_use]
    pub fn new(resource_type: impl Into<String>) -> Self {
        let lid: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(Self::LID_LENGTH)
            .map(char::from)
            .collect();

        Self {
            lid: Some(lid),
            ..Self::bare(resource_type.into(), None)
        }
    }

    /// Creates a resource that already has a server-assigned identifier.
    #[must_use]
    pub fn with_id(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::bare(resource_type.into(), Some(id.into()))
    }

    fn bare(resource_type: String, id: Option<String>) -> Self {
        Self {
            resource_type,
            id,
            lid: None,
            attributes: IndexMap::new(),
            relationships: IndexMap::new(),
            links: None,
            meta: None,
        }
    }

    /// Sets an attribute, returning the resource for chaining.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Sets a relationship's linkage, returning the resource for chaining.
    #[must_use]
    pub fn with_relationship(
        mut self,
        name: impl Into<String>,
        data: impl Into<RelationshipData>,
    ) -> Self {
        self.relationships
            .insert(name.into(), Relationship::new(data));
        self
    }

    /// Returns the `(type, id)` identifier once the resource is persisted.
    #[must_use]
    pub fn identifier(&self) -> Option<ResourceIdentifier> {
        self.id
            .as_ref()
            .map(|id| ResourceIdentifier::new(self.resource_type.clone(), id.clone()))
    }

    /// Returns `true` if this resource is `(resource_type, id)`.
    #[must_use]
    pub fn matches(&self, resource_type: &str, id: &str) -> bool {
        self.resource_type == resource_type && self.id.as_deref() == Some(id)
    }

    /// Returns the named relationship, if present.
    #[must_use]
    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.get(name)
    }
}
