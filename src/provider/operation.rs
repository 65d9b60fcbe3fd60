//! The operation model shared by every provider call.
//!
//! Each provider operation is one [`Operation`]: a kind, a [`ResourceRef`]
//! naming what it addresses, query parameters, and optional body data. URL
//! building, verb selection, body serialization, and schema validation are
//! driven from this one description, for single calls and bulk entries
//! alike.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::clients::HttpMethod;
use crate::document::{RelationshipData, Resource, ResourceIdentifier};
use crate::query::{encode_segment, QueryParams};
use crate::schema::{
    validate_linkage, validate_query, validate_resource, RelationshipSchema, SchemaError,
    SchemaRegistry, WriteMode,
};

/// The nine single-call operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Fetch one resource.
    GetOne,
    /// Fetch a collection.
    GetMany,
    /// Fetch relationship linkage.
    GetRelationship,
    /// Create a resource.
    AddOne,
    /// Append members to a to-many relationship.
    AddRelationship,
    /// Update a resource.
    UpdateOne,
    /// Replace relationship linkage.
    UpdateRelationship,
    /// Delete a resource.
    RemoveOne,
    /// Detach members from a to-many relationship.
    RemoveRelationship,
}

impl OperationKind {
    /// Returns the HTTP method the operation is sent with.
    #[must_use]
    pub const fn http_method(self) -> HttpMethod {
        match self {
            Self::GetOne | Self::GetMany | Self::GetRelationship => HttpMethod::Get,
            Self::AddOne | Self::AddRelationship => HttpMethod::Post,
            Self::UpdateOne | Self::UpdateRelationship => HttpMethod::Patch,
            Self::RemoveOne | Self::RemoveRelationship => HttpMethod::Delete,
        }
    }

    /// Returns the verb written as `op` in bulk requests.
    #[must_use]
    pub const fn action(self) -> &'static str {
        match self {
            Self::GetOne | Self::GetMany | Self::GetRelationship => "get",
            Self::AddOne | Self::AddRelationship => "add",
            Self::UpdateOne | Self::UpdateRelationship => "update",
            Self::RemoveOne | Self::RemoveRelationship => "remove",
        }
    }

    /// Returns the operation's name, e.g. `get-one`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetOne => "get-one",
            Self::GetMany => "get-many",
            Self::GetRelationship => "get-relationship",
            Self::AddOne => "add-one",
            Self::AddRelationship => "add-relationship",
            Self::UpdateOne => "update-one",
            Self::UpdateRelationship => "update-relationship",
            Self::RemoveOne => "remove-one",
            Self::RemoveRelationship => "remove-relationship",
        }
    }

    /// Returns `true` for operations addressing a relationship.
    #[must_use]
    pub const fn targets_relationship(self) -> bool {
        matches!(
            self,
            Self::GetRelationship
                | Self::AddRelationship
                | Self::UpdateRelationship
                | Self::RemoveRelationship
        )
    }

    /// Returns `true` for operations whose success document must carry
    /// non-null primary data.
    #[must_use]
    pub const fn requires_data(self) -> bool {
        matches!(self, Self::GetMany | Self::AddOne)
    }

    /// Returns `true` for operations whose success data is resources.
    #[must_use]
    pub const fn returns_resources(self) -> bool {
        matches!(
            self,
            Self::GetOne | Self::GetMany | Self::AddOne | Self::UpdateOne
        )
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an operation addresses.
///
/// Serializes as the `ref` member of a bulk entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResourceRef {
    /// A collection: `<prefix>/<type>`.
    Collection {
        /// The resource type.
        #[serde(rename = "type")]
        resource_type: String,
    },
    /// One resource: `<prefix>/<type>/<id>`.
    Resource {
        /// The resource type.
        #[serde(rename = "type")]
        resource_type: String,
        /// The resource id.
        id: String,
    },
    /// A relationship: `<prefix>/<type>/<id>/relationships/<relationship>`.
    Relationship {
        /// The owning resource's type.
        #[serde(rename = "type")]
        resource_type: String,
        /// The owning resource's id.
        id: String,
        /// The relationship name.
        relationship: String,
    },
}

impl ResourceRef {
    /// Returns the addressed resource type.
    #[must_use]
    pub fn resource_type(&self) -> &str {
        match self {
            Self::Collection { resource_type }
            | Self::Resource { resource_type, .. }
            | Self::Relationship { resource_type, .. } => resource_type,
        }
    }

    /// Returns the percent-encoded URL path segments below the prefix.
    #[must_use]
    pub fn path_segments(&self) -> Vec<String> {
        match self {
            Self::Collection { resource_type } => vec![encode_segment(resource_type)],
            Self::Resource { resource_type, id } => {
                vec![encode_segment(resource_type), encode_segment(id)]
            }
            Self::Relationship {
                resource_type,
                id,
                relationship,
            } => vec![
                encode_segment(resource_type),
                encode_segment(id),
                "relationships".to_string(),
                encode_segment(relationship),
            ],
        }
    }
}

/// Body data of a write operation.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OperationData {
    /// A full or partial resource.
    Resource(Resource),
    /// Relationship linkage.
    Linkage(RelationshipData),
}

/// One provider call: kind, reference, query parameters, and body data.
///
/// `P` is the page descriptor type of the provider's pagination composer.
///
/// # Example
///
/// ```rust
/// use jsonapi_provider::provider::{Operation, OperationKind};
/// use jsonapi_provider::query::QueryParams;
/// use jsonapi_provider::ResourceIdentifier;
///
/// let operation: Operation = Operation::add_relationship(
///     "notes",
///     "12",
///     "tags",
///     vec![ResourceIdentifier::new("tags", "3")],
/// )
/// .with_params(QueryParams::new());
///
/// assert_eq!(operation.kind(), OperationKind::AddRelationship);
/// assert_eq!(operation.target().path_segments(), ["notes", "12", "relationships", "tags"]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Operation<P = ()> {
    kind: OperationKind,
    target: ResourceRef,
    params: QueryParams<P>,
    data: Option<OperationData>,
}

impl<P> Operation<P> {
    fn new(kind: OperationKind, target: ResourceRef, data: Option<OperationData>) -> Self {
        Self {
            kind,
            target,
            params: QueryParams::default(),
            data,
        }
    }

    fn resource_ref(resource_type: impl Into<String>, id: impl Into<String>) -> ResourceRef {
        ResourceRef::Resource {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    fn relationship_ref(
        resource_type: impl Into<String>,
        id: impl Into<String>,
        relationship: impl Into<String>,
    ) -> ResourceRef {
        ResourceRef::Relationship {
            resource_type: resource_type.into(),
            id: id.into(),
            relationship: relationship.into(),
        }
    }

    /// Fetch one resource.
    #[must_use]
    pub fn get_one(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::new(
            OperationKind::GetOne,
            Self::resource_ref(resource_type, id),
            None,
        )
    }

    /// Fetch a collection.
    #[must_use]
    pub fn get_many(resource_type: impl Into<String>) -> Self {
        Self::new(
            OperationKind::GetMany,
            ResourceRef::Collection {
                resource_type: resource_type.into(),
            },
            None,
        )
    }

    /// Fetch relationship linkage.
    #[must_use]
    pub fn get_relationship(
        resource_type: impl Into<String>,
        id: impl Into<String>,
        relationship: impl Into<String>,
    ) -> Self {
        Self::new(
            OperationKind::GetRelationship,
            Self::relationship_ref(resource_type, id, relationship),
            None,
        )
    }

    /// Create `resource` in the `resource_type` collection.
    #[must_use]
    pub fn add_one(resource_type: impl Into<String>, resource: Resource) -> Self {
        Self::new(
            OperationKind::AddOne,
            ResourceRef::Collection {
                resource_type: resource_type.into(),
            },
            Some(OperationData::Resource(resource)),
        )
    }

    /// Append `identifiers` to a to-many relationship.
    #[must_use]
    pub fn add_relationship(
        resource_type: impl Into<String>,
        id: impl Into<String>,
        relationship: impl Into<String>,
        identifiers: Vec<ResourceIdentifier>,
    ) -> Self {
        Self::new(
            OperationKind::AddRelationship,
            Self::relationship_ref(resource_type, id, relationship),
            Some(OperationData::Linkage(RelationshipData::Many(identifiers))),
        )
    }

    /// Update a resource with the members present in `resource`.
    #[must_use]
    pub fn update_one(
        resource_type: impl Into<String>,
        id: impl Into<String>,
        resource: Resource,
    ) -> Self {
        Self::new(
            OperationKind::UpdateOne,
            Self::resource_ref(resource_type, id),
            Some(OperationData::Resource(resource)),
        )
    }

    /// Replace relationship linkage.
    #[must_use]
    pub fn update_relationship(
        resource_type: impl Into<String>,
        id: impl Into<String>,
        relationship: impl Into<String>,
        data: impl Into<RelationshipData>,
    ) -> Self {
        Self::new(
            OperationKind::UpdateRelationship,
            Self::relationship_ref(resource_type, id, relationship),
            Some(OperationData::Linkage(data.into())),
        )
    }

    /// Delete a resource.
    #[must_use]
    pub fn remove_one(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::new(
            OperationKind::RemoveOne,
            Self::resource_ref(resource_type, id),
            None,
        )
    }

    /// Detach `identifiers` from a to-many relationship.
    #[must_use]
    pub fn remove_relationship(
        resource_type: impl Into<String>,
        id: impl Into<String>,
        relationship: impl Into<String>,
        identifiers: Vec<ResourceIdentifier>,
    ) -> Self {
        Self::new(
            OperationKind::RemoveRelationship,
            Self::relationship_ref(resource_type, id, relationship),
            Some(OperationData::Linkage(RelationshipData::Many(identifiers))),
        )
    }

    /// Sets the query parameters.
    #[must_use]
    pub fn with_params(mut self, params: QueryParams<P>) -> Self {
        self.params = params;
        self
    }

    /// Returns the operation kind.
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Returns what the operation addresses.
    #[must_use]
    pub const fn target(&self) -> &ResourceRef {
        &self.target
    }

    /// Returns the query parameters.
    #[must_use]
    pub const fn params(&self) -> &QueryParams<P> {
        &self.params
    }

    /// Returns the body data, if the operation carries any.
    #[must_use]
    pub const fn data(&self) -> Option<&OperationData> {
        self.data.as_ref()
    }

    /// Serializes the request body: `{"data": ...}`, or `None` without data.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be serialized.
    pub fn body(&self) -> Result<Option<Value>, serde_json::Error> {
        let Some(data) = &self.data else {
            return Ok(None);
        };

        let mut body = Map::new();
        body.insert("data".to_string(), serde_json::to_value(data)?);
        Ok(Some(Value::Object(body)))
    }

    /// Validates the operation against `registry`.
    ///
    /// Checks that the addressed type and relationship are declared, that
    /// add/remove-relationship target to-many relationships, that writes
    /// respect mutability and cardinality, that a body resource matches the
    /// addressed type and id, and that query parameters fit the type of the
    /// primary data the operation returns.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found.
    pub fn validate(&self, registry: &SchemaRegistry) -> Result<(), SchemaError> {
        let resource_type = self.target.resource_type();
        registry.resource(resource_type)?;

        let primary_type = match &self.target {
            ResourceRef::Relationship { relationship, .. } => {
                let declared = registry.relationship(resource_type, relationship)?;
                self.validate_relationship_write(resource_type, relationship, declared)?;
                declared.target.as_str()
            }
            ResourceRef::Collection { .. } | ResourceRef::Resource { .. } => resource_type,
        };

        if let Some(OperationData::Resource(resource)) = &self.data {
            if resource.resource_type != resource_type {
                return Err(SchemaError::TypeMismatch {
                    expected: resource_type.to_string(),
                    found: resource.resource_type.clone(),
                });
            }
            let mode = if self.kind == OperationKind::AddOne {
                WriteMode::Create
            } else {
                WriteMode::Update
            };
            if let (ResourceRef::Resource { id, .. }, Some(found)) = (&self.target, &resource.id) {
                if id != found {
                    return Err(SchemaError::IdMismatch {
                        expected: id.clone(),
                        found: found.clone(),
                    });
                }
            }
            validate_resource(registry, resource, mode)?;
        }

        validate_query(registry, primary_type, &self.params)
    }

    fn validate_relationship_write(
        &self,
        resource_type: &str,
        relationship: &str,
        declared: &RelationshipSchema,
    ) -> Result<(), SchemaError> {
        if matches!(
            self.kind,
            OperationKind::AddRelationship | OperationKind::RemoveRelationship
        ) && !declared.cardinality.is_many()
        {
            return Err(SchemaError::ToManyOnly {
                resource_type: resource_type.to_string(),
                relationship: relationship.to_string(),
            });
        }

        if self.kind != OperationKind::GetRelationship && !declared.mutable {
            return Err(SchemaError::ImmutableRelationship {
                resource_type: resource_type.to_string(),
                relationship: relationship.to_string(),
            });
        }

        if let Some(OperationData::Linkage(data)) = &self.data {
            validate_linkage(resource_type, relationship, declared, data, false)?;
        }

        Ok(())
    }
}
