//! Resource provider over an injected transport.
//!
//! [`NetworkResourceProvider`] maps each operation to a verb, URL, and body,
//! and hands the request to its [`Transport`]:
//!
//! | Operation | Verb | URL |
//! |---|---|---|
//! | get / update / remove one | GET / PATCH / DELETE | `<prefix>/<type>/<id>?<query>` |
//! | get many / add one | GET / POST | `<prefix>/<type>?<query>` |
//! | relationship operations | GET / POST / PATCH / DELETE | `<prefix>/<type>/<id>/relationships/<name>?<query>` |
//! | bulk | PATCH | `<prefix>/bulk` |
//!
//! The `?` is always present, even when the query is empty.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::clients::{HttpMethod, ReqwestTransport, Transport, TransportRequest};
use crate::config::{ProviderConfig, JSON_API_MEDIA_TYPE};
use crate::document::{DataDocument, Document, DocumentError, RelationshipData, Resource};
use crate::provider::bulk::{bind_results, bulk_body};
use crate::provider::{BulkResponse, Operation, ProviderError, ResourceProvider, ResourceRef};
use crate::query::{compose, encode_query, NoPagination, PaginationComposer};
use crate::schema::{validate_linkage, validate_response, SchemaRegistry};

/// A [`ResourceProvider`] that sends every operation through a transport.
///
/// The provider holds no state beyond its configuration, transport, and
/// pagination composer. Independent calls may run concurrently.
///
/// # Thread Safety
///
/// `NetworkResourceProvider` is `Send + Sync` whenever its transport and
/// composer are, which the [`Transport`] and [`PaginationComposer`] traits
/// require.
///
/// # Example
///
/// ```rust
/// use jsonapi_provider::clients::{TransportError, TransportRequest};
/// use jsonapi_provider::provider::{NetworkResourceProvider, Operation, ResourceProvider};
/// use jsonapi_provider::query::NoPagination;
/// use jsonapi_provider::{ApiPrefix, ProviderConfig};
/// use serde_json::{json, Value};
///
/// let config = ProviderConfig::builder()
///     .prefix(ApiPrefix::new("/api").unwrap())
///     .build()
///     .unwrap();
/// let transport = |request: TransportRequest| async move {
///     assert_eq!(request.url, "/api/notes/12?");
///     Ok::<Value, TransportError>(json!({"data": {"type": "notes", "id": "12"}}))
/// };
/// let provider = NetworkResourceProvider::new(config, transport, NoPagination);
///
/// assert_eq!(provider.url_for(&Operation::get_one("notes", "12")), "/api/notes/12?");
/// ```
#[derive(Debug)]
pub struct NetworkResourceProvider<T, C = NoPagination> {
    config: ProviderConfig,
    transport: T,
    composer: C,
}

// Verify NetworkResourceProvider is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<NetworkResourceProvider<ReqwestTransport>>();
};

impl<T, C> NetworkResourceProvider<T, C>
where
    T: Transport,
    C: PaginationComposer,
{
    /// Creates a provider.
    #[must_use]
    pub const fn new(config: ProviderConfig, transport: T, composer: C) -> Self {
        Self {
            config,
            transport,
            composer,
        }
    }

    /// Returns the provider configuration.
    #[must_use]
    pub const fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Returns the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the pagination composer.
    #[must_use]
    pub const fn composer(&self) -> &C {
        &self.composer
    }

    /// Builds the request target for `operation`: prefix, path, `?`, query.
    #[must_use]
    pub fn url_for(&self, operation: &Operation<C::Page>) -> String {
        let segments = operation.target().path_segments();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
        let path = self.config.prefix().join(&segments);
        let query = encode_query(&compose(operation.params(), &self.composer));
        format!("{path}?{query}")
    }

    /// Builds the transport request for `operation`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Serialize`] if the body cannot be serialized.
    pub fn request_for(&self, operation: &Operation<C::Page>) -> Result<TransportRequest, ProviderError> {
        let body = operation.body().map_err(ProviderError::Serialize)?;
        self.build_request(operation.kind().http_method(), self.url_for(operation), body)
    }

    fn build_request(
        &self,
        method: HttpMethod,
        url: String,
        body: Option<Value>,
    ) -> Result<TransportRequest, ProviderError> {
        let mut builder = TransportRequest::builder(method, url).headers(self.config.headers());
        if let Some(body) = body {
            builder = builder
                .header("Content-Type", JSON_API_MEDIA_TYPE)
                .body(body);
        }
        Ok(builder.build()?)
    }
}

#[async_trait]
impl<T, C> ResourceProvider for NetworkResourceProvider<T, C>
where
    T: Transport,
    C: PaginationComposer,
{
    type Page = C::Page;

    async fn execute(
        &self,
        operation: &Operation<Self::Page>,
    ) -> Result<Document<Value>, ProviderError> {
        if let Some(schema) = self.config.schema() {
            operation.validate(schema)?;
        }

        let request = self.request_for(operation)?;
        tracing::debug!("{} {} ({})", request.method, request.url, operation.kind());

        let body = self.transport.send(request).await?;
        let document = Document::from_value(body)?;
        check_document(self.config.schema(), operation, &document)?;

        Ok(document)
    }

    async fn bulk(
        &self,
        operations: Vec<Operation<Self::Page>>,
    ) -> Result<BulkResponse<Self::Page>, ProviderError> {
        if operations.is_empty() {
            return Ok(BulkResponse::Operations(Vec::new()));
        }

        if let Some(schema) = self.config.schema() {
            for operation in &operations {
                operation.validate(schema)?;
            }
        }

        let body = bulk_body(&operations, &self.composer).map_err(ProviderError::Serialize)?;
        let url = self.config.prefix().join(&["bulk"]);
        let request = self.build_request(HttpMethod::Patch, url, Some(body))?;
        tracing::debug!(
            "{} {} ({} operations)",
            request.method,
            request.url,
            operations.len()
        );

        let body = self.transport.send(request).await?;
        let response = bind_results(operations, body)?;

        match &response {
            BulkResponse::Errors(errors) => {
                tracing::debug!("bulk returned {} error(s)", errors.errors.len());
            }
            BulkResponse::Operations(entries) => {
                for entry in entries {
                    check_document(self.config.schema(), &entry.operation, &entry.result)?;
                }
            }
        }

        Ok(response)
    }
}

/// Logs error documents, rejects missing primary data where the operation
/// needs it, and validates success documents against the schema.
fn check_document<P>(
    schema: Option<&SchemaRegistry>,
    operation: &Operation<P>,
    document: &Document<Value>,
) -> Result<(), ProviderError> {
    match document {
        Document::Errors(errors) => {
            tracing::debug!(
                "{} returned {} error(s)",
                operation.kind(),
                errors.errors.len()
            );
            Ok(())
        }
        Document::Data(data) if data.data.is_null() && operation.kind().requires_data() => {
            Err(DocumentError::MissingPrimaryData.into())
        }
        Document::Data(data) => match schema {
            Some(schema) => validate_document(schema, operation, data),
            None => Ok(()),
        },
    }
}

fn validate_document<P>(
    schema: &SchemaRegistry,
    operation: &Operation<P>,
    document: &DataDocument<Value>,
) -> Result<(), ProviderError> {
    let kind = operation.kind();

    if kind.returns_resources() {
        let primary = match &document.data {
            Value::Null => Vec::new(),
            Value::Array(_) => Vec::<Resource>::deserialize(&document.data)
                .map_err(DocumentError::from)?,
            _ => vec![Resource::deserialize(&document.data)
                .map_err(DocumentError::from)?],
        };
        validate_response(schema, primary.iter().chain(&document.included))?;
        return Ok(());
    }

    if let ResourceRef::Relationship {
        resource_type,
        relationship,
        ..
    } = operation.target()
    {
        let declared = schema.relationship(resource_type, relationship)?;
        // 204 No Content on a to-many write carries no linkage to check.
        if !(document.data.is_null() && declared.cardinality.is_many()) {
            let linkage = RelationshipData::deserialize(&document.data)
                .map_err(DocumentError::from)?;
            validate_linkage(resource_type, relationship, declared, &linkage, true)?;
        }
    }

    validate_response(schema, &document.included)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::TransportError;
    use crate::config::ApiPrefix;
    use crate::document::ResourceIdentifier;
    use crate::query::{OffsetPage, OffsetPagination, QueryParams, SortTerm};
    use crate::schema::{RelationshipSchema, ResourceSchema};
    use serde_json::json;

    fn config(prefix: &str) -> ProviderConfig {
        ProviderConfig::builder()
            .prefix(ApiPrefix::new(prefix).unwrap())
            .build()
            .unwrap()
    }

    async fn unreachable_transport(_: TransportRequest) -> Result<Value, TransportError> {
        Err(TransportError::other("not expected to be called"))
    }

    #[test]
    fn test_url_for_each_ref_shape() {
        let provider = NetworkResourceProvider::new(config("/api"), unreachable_transport, NoPagination);

        assert_eq!(provider.url_for(&Operation::get_one("notes", "12")), "/api/notes/12?");
        assert_eq!(provider.url_for(&Operation::get_many("notes")), "/api/notes?");
        assert_eq!(
            provider.url_for(&Operation::get_relationship("notes", "12", "tags")),
            "/api/notes/12/relationships/tags?"
        );
    }

    #[test]
    fn test_url_for_with_empty_prefix() {
        let provider = NetworkResourceProvider::new(config(""), unreachable_transport, NoPagination);
        assert_eq!(provider.url_for(&Operation::get_many("notes")), "/notes?");
    }

    #[test]
    fn test_url_for_includes_page_pairs() {
        let provider =
            NetworkResourceProvider::new(config("/api"), unreachable_transport, OffsetPagination);
        let operation = Operation::get_many("notes").with_params(
            QueryParams::new()
                .page(OffsetPage::new(40).limit(20))
                .sort(SortTerm::asc("title")),
        );

        assert_eq!(
            provider.url_for(&operation),
            "/api/notes?page[offset]=40&page[limit]=20&sort=title"
        );
    }

    #[test]
    fn test_request_for_sets_content_type_only_with_body() {
        let provider = NetworkResourceProvider::new(config("/api"), unreachable_transport, NoPagination);

        let get = provider.request_for(&Operation::get_one("notes", "1")).unwrap();
        assert!(get.headers.get("Content-Type").is_none());
        assert_eq!(get.headers.get("Accept").map(String::as_str), Some(JSON_API_MEDIA_TYPE));

        let add = provider
            .request_for(&Operation::add_relationship(
                "notes",
                "1",
                "tags",
                vec![ResourceIdentifier::new("tags", "2")],
            ))
            .unwrap();
        assert_eq!(add.method, HttpMethod::Post);
        assert_eq!(
            add.headers.get("Content-Type").map(String::as_str),
            Some(JSON_API_MEDIA_TYPE)
        );
        assert_eq!(add.body, Some(json!({"data": [{"type": "tags", "id": "2"}]})));
    }

    #[test]
    fn test_configured_content_type_is_not_duplicated() {
        let config = ProviderConfig::builder()
            .prefix(ApiPrefix::new("/api").unwrap())
            .header("content-type", "application/json")
            .build()
            .unwrap();
        let provider = NetworkResourceProvider::new(config, unreachable_transport, NoPagination);

        let request = provider
            .request_for(&Operation::remove_relationship(
                "notes",
                "1",
                "tags",
                vec![ResourceIdentifier::new("tags", "2")],
            ))
            .unwrap();

        let content_types: Vec<&String> = request
            .headers
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .map(|(_, value)| value)
            .collect();
        assert_eq!(content_types, vec![JSON_API_MEDIA_TYPE]);
    }

    #[test]
    fn test_validate_document_rejects_unknown_response_attribute() {
        let schema = SchemaRegistry::new().with(
            "notes",
            ResourceSchema::new()
                .attribute("title")
                .relationship("author", RelationshipSchema::single("people")),
        );
        let operation: Operation = Operation::get_one("notes", "1");
        let document = DataDocument::new(json!({
            "type": "notes",
            "id": "1",
            "attributes": {"body": "x"}
        }));

        assert!(matches!(
            validate_document(&schema, &operation, &document),
            Err(ProviderError::Schema(_))
        ));
    }

    #[test]
    fn test_validate_document_accepts_null_single_linkage() {
        let schema = SchemaRegistry::new()
            .with(
                "notes",
                ResourceSchema::new().relationship("author", RelationshipSchema::single("people")),
            )
            .with("people", ResourceSchema::new());
        let operation: Operation = Operation::get_relationship("notes", "1", "author");

        assert!(validate_document(&schema, &operation, &DataDocument::new(Value::Null)).is_ok());
    }
}
