//! Dirty tracking for partial updates.
//!
//! This module provides [`TrackedResource`], a wrapper that remembers the
//! state of a [`Resource`] when it was loaded or last saved. Its
//! [`changes`](TrackedResource::changes) method yields the partial resource
//! sent as the body of an `update-one` operation: `type` and `id` plus only
//! the attributes and relationships that differ from the snapshot.
//!
//! # Example
//!
//! ```rust
//! use jsonapi_provider::{Resource, TrackedResource};
//! use serde_json::json;
//!
//! let loaded = Resource::with_id("notes", "1")
//!     .with_attribute("title", json!("Draft"))
//!     .with_attribute("body", json!("..."));
//!
//! let mut tracked = TrackedResource::from_existing(loaded);
//! assert!(!tracked.is_dirty());
//!
//! tracked.attributes.insert("title".to_string(), json!("Final"));
//!
//! let patch = tracked.changes();
//! assert_eq!(patch.attributes.len(), 1);
//! assert_eq!(patch.attributes["title"], json!("Final"));
//!
//! tracked.mark_clean();
//! assert!(!tracked.is_dirty());
//! ```

use std::ops::{Deref, DerefMut};

use serde_json::Value;

use super::{Relationship, RelationshipData, Resource};

/// A resource paired with the snapshot it is compared against.
///
/// Implements `Deref<Target = Resource>` and `DerefMut`, so the resource can
/// be read and modified transparently.
#[derive(Debug, Clone)]
pub struct TrackedResource {
    resource: Resource,
    /// `None` for resources that have not been saved yet.
    original: Option<Resource>,
}

impl TrackedResource {
    /// Tracks a resource that does not exist on the server yet.
    ///
    /// New resources are always dirty and [`changes`](Self::changes)
    /// returns the whole resource.
    #[must_use]
    pub const fn new(resource: Resource) -> Self {
        Self {
            resource,
            original: None,
        }
    }

    /// Tracks a resource loaded from the server, snapshotting its state.
    #[must_use]
    pub fn from_existing(resource: Resource) -> Self {
        let original = Some(resource.clone());
        Self { resource, original }
    }

    /// Returns `true` if the resource differs from its snapshot.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.original
            .as_ref()
            .map_or(true, |original| {
                original.attributes != self.resource.attributes
                    || original.relationships != self.resource.relationships
            })
    }

    /// Returns `true` if this resource has never been saved.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.original.is_none()
    }

    /// Builds the partial resource holding only changed members.
    ///
    /// Attributes removed since the snapshot are sent as `null`. Relationships
    /// removed since the snapshot are sent cleared: `null` for to-one, `[]`
    /// for to-many. Links and meta are never part of the patch.
    #[must_use]
    pub fn changes(&self) -> Resource {
        let Some(original) = &self.original else {
            return self.resource.clone();
        };

        let mut patch = Resource {
            resource_type: self.resource.resource_type.clone(),
            id: self.resource.id.clone(),
            lid: self.resource.lid.clone(),
            attributes: indexmap::IndexMap::new(),
            relationships: indexmap::IndexMap::new(),
            links: None,
            meta: None,
        };

        for (name, value) in &self.resource.attributes {
            if original.attributes.get(name) != Some(value) {
                patch.attributes.insert(name.clone(), value.clone());
            }
        }
        for name in original.attributes.keys() {
            if !self.resource.attributes.contains_key(name) {
                patch.attributes.insert(name.clone(), Value::Null);
            }
        }

        for (name, relationship) in &self.resource.relationships {
            let changed = original
                .relationships
                .get(name)
                .map_or(true, |previous| previous.data != relationship.data);
            if changed {
                let mut linkage = relationship.clone();
                linkage.links = None;
                linkage.meta = None;
                patch.relationships.insert(name.clone(), linkage);
            }
        }
        for (name, previous) in &original.relationships {
            if !self.resource.relationships.contains_key(name) {
                let cleared = if previous.data.is_many() {
                    RelationshipData::Many(Vec::new())
                } else {
                    RelationshipData::One(None)
                };
                patch
                    .relationships
                    .insert(name.clone(), Relationship::new(cleared));
            }
        }

        patch
    }

    /// Takes the current state as the new snapshot.
    ///
    /// Call this after a successful save.
    pub fn mark_clean(&mut self) {
        self.original = Some(self.resource.clone());
    }

    /// Replaces the resource with the server's copy and marks it clean.
    pub fn accept(&mut self, saved: Resource) {
        self.resource = saved;
        self.mark_clean();
    }

    /// Consumes the wrapper and returns the inner resource.
    #[must_use]
    pub fn into_inner(self) -> Resource {
        self.resource
    }
}

impl Deref for TrackedResource {
    type Target = Resource;

    fn deref(&self) -> &Self::Target {
        &self.resource
    }
}

impl DerefMut for TrackedResource {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.resource
    }
}
