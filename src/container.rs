//! Relationship resolution over a decoded document.
//!
//! A [`ResourceContainer`] is a read-only view over the primary resources of
//! one document and its `included` set. It resolves a named relationship of
//! any resource it can see into the side-loaded resources it points at,
//! without further requests.
//!
//! Lookups are linear scans in document order, and the first resource
//! matching a `(type, id)` pair wins when a response contains duplicates.
//! Resolution never follows more than one hop.
//!
//! # Example
//!
//! ```rust
//! use jsonapi_provider::{Document, Resource, Resolved};
//! use serde_json::json;
//!
//! let document: Document<Vec<Resource>> = serde_json::from_value(json!({
//!     "data": [{
//!         "type": "notes",
//!         "id": "1",
//!         "relationships": { "author": { "data": { "type": "people", "id": "9" } } }
//!     }],
//!     "included": [{ "type": "people", "id": "9", "attributes": { "name": "Ada" } }]
//! }))
//! .unwrap();
//!
//! let data = document.as_data().unwrap();
//! let container = data.container();
//!
//! match container.get_relationship("notes", "1", "author").unwrap() {
//!     Resolved::One(person) => assert_eq!(person.attributes["name"], json!("Ada")),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

use std::slice;

use thiserror::Error;

use crate::document::{DataDocument, RelationshipData, Resource, ResourceIdentifier};

/// Errors raised when a relationship cannot be looked up at all.
///
/// A relationship whose targets were not side-loaded is not an error; see
/// [`Resolved::Missing`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContainerError {
    /// No primary or included resource has this `(type, id)`.
    #[error("Resource '{resource_type}' with id '{id}' is not in the document")]
    ResourceNotFound {
        /// The requested type.
        resource_type: String,
        /// The requested id.
        id: String,
    },

    /// The resource has no entry for the relationship.
    #[error("Resource '{resource_type}' with id '{id}' does not declare relationship '{relationship}'")]
    RelationshipNotDeclared {
        /// The owning resource's type.
        resource_type: String,
        /// The owning resource's id.
        id: String,
        /// The requested relationship.
        relationship: String,
    },
}

/// The result of resolving a relationship.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolved<'a> {
    /// A to-one relationship set to `null`.
    Null,
    /// A to-one relationship whose target was not side-loaded. Request the
    /// relationship with `include` to resolve it.
    Missing(&'a ResourceIdentifier),
    /// The resolved to-one target.
    One(&'a Resource),
    /// The side-loaded to-many targets, in linkage order. Targets that were
    /// not side-loaded are left out.
    Many(Vec<&'a Resource>),
}

impl<'a> Resolved<'a> {
    /// Returns the to-one target, if resolved.
    #[must_use]
    pub const fn as_one(&self) -> Option<&'a Resource> {
        match self {
            Self::One(resource) => Some(*resource),
            _ => None,
        }
    }

    /// Returns the resolved resources: zero or one for to-one, all found for to-many.
    #[must_use]
    pub fn resources(&self) -> Vec<&'a Resource> {
        match self {
            Self::Null | Self::Missing(_) => Vec::new(),
            Self::One(resource) => vec![*resource],
            Self::Many(resources) => resources.clone(),
        }
    }
}

/// A borrowed view over primary and included resources.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResourceContainer<'a> {
    primary: &'a [Resource],
    included: &'a [Resource],
}

impl<'a> ResourceContainer<'a> {
    /// Creates a container over a primary list and an included set.
    #[must_use]
    pub const fn new(primary: &'a [Resource], included: &'a [Resource]) -> Self {
        Self { primary, included }
    }

    /// Creates a container over a single primary resource.
    #[must_use]
    pub const fn single(primary: &'a Resource, included: &'a [Resource]) -> Self {
        Self::new(slice::from_ref(primary), included)
    }

    /// Returns the primary resources.
    #[must_use]
    pub const fn primary(&self) -> &'a [Resource] {
        self.primary
    }

    /// Returns the included resources.
    #[must_use]
    pub const fn included(&self) -> &'a [Resource] {
        self.included
    }

    /// Finds a resource, searching primary resources before included ones.
    #[must_use]
    pub fn find(&self, resource_type: &str, id: &str) -> Option<&'a Resource> {
        self.primary
            .iter()
            .chain(self.included)
            .find(|resource| resource.matches(resource_type, id))
    }

    /// Finds a resource in the included set only.
    #[must_use]
    pub fn find_included(&self, identifier: &ResourceIdentifier) -> Option<&'a Resource> {
        self.included
            .iter()
            .find(|resource| resource.matches(&identifier.resource_type, &identifier.id))
    }

    /// Resolves `relationship` of the resource `(resource_type, id)`.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::ResourceNotFound`] if the owner is in
    /// neither set, or [`ContainerError::RelationshipNotDeclared`] if the
    /// owner has no such relationship.
    pub fn get_relationship(
        &self,
        resource_type: &str,
        id: &str,
        relationship: &str,
    ) -> Result<Resolved<'a>, ContainerError> {
        let owner = self
            .find(resource_type, id)
            .ok_or_else(|| ContainerError::ResourceNotFound {
                resource_type: resource_type.to_string(),
                id: id.to_string(),
            })?;

        let linkage = owner
            .relationship(relationship)
            .ok_or_else(|| ContainerError::RelationshipNotDeclared {
                resource_type: resource_type.to_string(),
                id: id.to_string(),
                relationship: relationship.to_string(),
            })?;

        Ok(match &linkage.data {
            RelationshipData::One(None) => Resolved::Null,
            RelationshipData::One(Some(identifier)) => self
                .find_included(identifier)
                .map_or(Resolved::Missing(identifier), Resolved::One),
            RelationshipData::Many(identifiers) => Resolved::Many(
                identifiers
                    .iter()
                    .filter_map(|identifier| self.find_included(identifier))
                    .collect(),
            ),
        })
    }
}

impl DataDocument<Vec<Resource>> {
    /// Returns a container over this collection document.
    #[must_use]
    pub fn container(&self) -> ResourceContainer<'_> {
        ResourceContainer::new(&self.data, &self.included)
    }
}

impl DataDocument<Option<Resource>> {
    /// Returns a container over this document; empty primary data when `null`.
    #[must_use]
    pub fn container(&self) -> ResourceContainer<'_> {
        ResourceContainer::new(
            self.data.as_ref().map_or(&[][..], slice::from_ref),
            &self.included,
        )
    }
}

impl DataDocument<Resource> {
    /// Returns a container over this single-resource document.
    #[must_use]
    pub fn container(&self) -> ResourceContainer<'_> {
        ResourceContainer::single(&self.data, &self.included)
    }
}
