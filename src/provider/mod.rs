//! Resource providers.
//!
//! A [`ResourceProvider`] expresses every JSON:API operation uniformly: a
//! reference, query parameters, and optional data go in, and a
//! [`Document`] comes out. The document is either success data shaped by the
//! operation or a protocol-level error document; failures to complete the
//! exchange are [`ProviderError`]s.
//!
//! | Operation | Ref | Body | Success data |
//! |---|---|---|---|
//! | `get_one` | type, id | no | `Option<Resource>` |
//! | `get_many` | type | no | `Vec<Resource>` |
//! | `get_relationship` | type, id, relationship | no | [`RelationshipData`] |
//! | `add_one` | type | resource | `Resource` |
//! | `add_relationship` | type, id, relationship | identifiers | [`RelationshipData`] |
//! | `update_one` | type, id | partial resource | `Option<Resource>` |
//! | `update_relationship` | type, id, relationship | linkage | [`RelationshipData`] |
//! | `remove_one` | type, id | no | `()` |
//! | `remove_relationship` | type, id, relationship | identifiers | [`RelationshipData`] |
//! | `bulk` | | operations | [`BulkResponse`] |
//!
//! Implementors provide [`ResourceProvider::execute`] and
//! [`ResourceProvider::bulk`]; the typed operations are built on them.
//!
//! # Example
//!
//! ```rust,ignore
//! use jsonapi_provider::{Document, ResourceProvider};
//! use jsonapi_provider::query::QueryParams;
//!
//! match provider.get_one("notes", "12", QueryParams::new()).await? {
//!     Document::Data(doc) => println!("{:?}", doc.data),
//!     Document::Errors(doc) => println!("{} error(s)", doc.errors.len()),
//! }
//! ```

mod bulk;
mod network;
mod operation;

pub use bulk::{BulkEntry, BulkResponse};
pub use network::NetworkResourceProvider;
pub use operation::{Operation, OperationData, OperationKind, ResourceRef};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::clients::{InvalidRequestError, TransportError};
use crate::document::{Document, DocumentError, RelationshipData, Resource, ResourceIdentifier};
use crate::query::QueryParams;
use crate::schema::SchemaError;

/// Errors returned by provider operations.
///
/// Protocol-level error documents are not errors: they are returned as
/// [`Document::Errors`].
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The transport failed. Propagated unchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response is not a valid document for the operation.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The request or response does not match the configured schema.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The request could not be built.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidRequestError),

    /// The request body could not be serialized.
    #[error("Failed to serialize request body: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A bulk response's result count differs from the submitted count.
    #[error("Bulk response has {actual} results for {expected} operations")]
    BulkLengthMismatch {
        /// The number of submitted operations.
        expected: usize,
        /// The number of returned results.
        actual: usize,
    },
}

/// The uniform operation set over JSON:API resources.
///
/// Every non-bulk operation makes exactly one round trip. `bulk` makes one
/// round trip for the whole list and binds results to operations by
/// position.
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    /// The page descriptor type accepted in query parameters.
    type Page: Clone + Send + Sync;

    /// Executes one operation and returns the raw document.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the operation cannot be sent, the
    /// transport fails, or the response is not a document.
    async fn execute(&self, operation: &Operation<Self::Page>)
        -> Result<Document<Value>, ProviderError>;

    /// Submits `operations` as one atomic bulk request.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::BulkLengthMismatch`] if the response does not
    /// carry exactly one result per operation, or any error `execute` can
    /// return.
    async fn bulk(
        &self,
        operations: Vec<Operation<Self::Page>>,
    ) -> Result<BulkResponse<Self::Page>, ProviderError>;

    /// Fetches one resource. `null` data means not found.
    ///
    /// # Errors
    ///
    /// See [`ResourceProvider::execute`].
    async fn get_one(
        &self,
        resource_type: &str,
        id: &str,
        params: QueryParams<Self::Page>,
    ) -> Result<Document<Option<Resource>>, ProviderError> {
        let operation = Operation::get_one(resource_type, id).with_params(params);
        Ok(self.execute(&operation).await?.decode()?)
    }

    /// Fetches a collection.
    ///
    /// # Errors
    ///
    /// See [`ResourceProvider::execute`].
    async fn get_many(
        &self,
        resource_type: &str,
        params: QueryParams<Self::Page>,
    ) -> Result<Document<Vec<Resource>>, ProviderError> {
        let operation = Operation::get_many(resource_type).with_params(params);
        Ok(self.execute(&operation).await?.decode()?)
    }

    /// Fetches relationship linkage.
    ///
    /// # Errors
    ///
    /// See [`ResourceProvider::execute`].
    async fn get_relationship(
        &self,
        resource_type: &str,
        id: &str,
        relationship: &str,
        params: QueryParams<Self::Page>,
    ) -> Result<Document<RelationshipData>, ProviderError> {
        let operation =
            Operation::get_relationship(resource_type, id, relationship).with_params(params);
        Ok(self.execute(&operation).await?.decode()?)
    }

    /// Creates a resource and returns it as stored by the server.
    ///
    /// # Errors
    ///
    /// See [`ResourceProvider::execute`].
    async fn add_one(
        &self,
        resource_type: &str,
        resource: Resource,
        params: QueryParams<Self::Page>,
    ) -> Result<Document<Resource>, ProviderError> {
        let operation = Operation::add_one(resource_type, resource).with_params(params);
        Ok(self.execute(&operation).await?.decode()?)
    }

    /// Appends members to a to-many relationship.
    ///
    /// A `204 No Content` answer reads as an empty list.
    ///
    /// # Errors
    ///
    /// See [`ResourceProvider::execute`].
    async fn add_relationship(
        &self,
        resource_type: &str,
        id: &str,
        relationship: &str,
        identifiers: Vec<ResourceIdentifier>,
        params: QueryParams<Self::Page>,
    ) -> Result<Document<RelationshipData>, ProviderError> {
        let operation = Operation::add_relationship(resource_type, id, relationship, identifiers)
            .with_params(params);
        Ok(null_as_empty_list(self.execute(&operation).await?).decode()?)
    }

    /// Updates a resource with the members present in `resource`.
    ///
    /// `null` data means the server accepted the update without returning
    /// the resource.
    ///
    /// # Errors
    ///
    /// See [`ResourceProvider::execute`].
    async fn update_one(
        &self,
        resource_type: &str,
        id: &str,
        resource: Resource,
        params: QueryParams<Self::Page>,
    ) -> Result<Document<Option<Resource>>, ProviderError> {
        let operation = Operation::update_one(resource_type, id, resource).with_params(params);
        Ok(self.execute(&operation).await?.decode()?)
    }

    /// Replaces relationship linkage.
    ///
    /// When `data` is a list, a `204 No Content` answer reads as an empty
    /// list.
    ///
    /// # Errors
    ///
    /// See [`ResourceProvider::execute`].
    async fn update_relationship(
        &self,
        resource_type: &str,
        id: &str,
        relationship: &str,
        data: RelationshipData,
        params: QueryParams<Self::Page>,
    ) -> Result<Document<RelationshipData>, ProviderError> {
        let to_many = data.is_many();
        let operation = Operation::update_relationship(resource_type, id, relationship, data)
            .with_params(params);
        let document = self.execute(&operation).await?;
        let document = if to_many {
            null_as_empty_list(document)
        } else {
            document
        };
        Ok(document.decode()?)
    }

    /// Deletes a resource.
    ///
    /// # Errors
    ///
    /// See [`ResourceProvider::execute`].
    async fn remove_one(
        &self,
        resource_type: &str,
        id: &str,
        params: QueryParams<Self::Page>,
    ) -> Result<Document<()>, ProviderError> {
        let operation = Operation::remove_one(resource_type, id).with_params(params);
        Ok(self.execute(&operation).await?.map(|_| ()))
    }

    /// Detaches members from a to-many relationship.
    ///
    /// A `204 No Content` answer reads as an empty list.
    ///
    /// # Errors
    ///
    /// See [`ResourceProvider::execute`].
    async fn remove_relationship(
        &self,
        resource_type: &str,
        id: &str,
        relationship: &str,
        identifiers: Vec<ResourceIdentifier>,
        params: QueryParams<Self::Page>,
    ) -> Result<Document<RelationshipData>, ProviderError> {
        let operation =
            Operation::remove_relationship(resource_type, id, relationship, identifiers)
                .with_params(params);
        Ok(null_as_empty_list(self.execute(&operation).await?).decode()?)
    }
}

/// Reads `null` primary data as an empty identifier list.
///
/// Servers answer to-many relationship writes with `204 No Content`, which
/// decodes to `null` data.
fn null_as_empty_list(document: Document<Value>) -> Document<Value> {
    document.map(|data| match data {
        Value::Null => Value::Array(Vec::new()),
        data => data,
    })
}
