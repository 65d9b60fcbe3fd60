//! JSON:API document model.
//!
//! This module contains the request-scoped value types exchanged with the
//! server:
//!
//! - [`ResourceIdentifier`]: a `(type, id)` reference
//! - [`Resource`], [`Relationship`], [`RelationshipData`]: resource objects
//! - [`Document`]: a success ([`DataDocument`]) or error ([`ErrorDocument`]) payload
//! - [`TrackedResource`]: dirty tracking for partial updates
//!
//! None of these types own runtime state beyond their values: they are built
//! from a decoded response, consumed, and dropped.

mod envelope;
mod identifier;
mod resource;
mod tracking;

pub use envelope::{
    DataDocument, Document, DocumentError, ErrorDocument, ErrorObject, ErrorSource,
    PaginationLinks,
};
pub use identifier::ResourceIdentifier;
pub use resource::{Link, Links, Meta, Relationship, RelationshipData, Resource};
pub use tracking::TrackedResource;
