//! Integration tests for bulk requests.
//!
//! These tests verify the bulk request shape and the positional binding of
//! results to submitted operations.

use std::sync::Arc;

use jsonapi_provider::clients::{HttpMethod, TransportError, TransportRequest};
use jsonapi_provider::query::{NoPagination, QueryParams, SortTerm};
use jsonapi_provider::{
    ApiPrefix, BulkResponse, Document, NetworkResourceProvider, Operation, OperationKind,
    ProviderConfig, ProviderError, Resource, ResourceIdentifier, ResourceProvider,
};
use serde_json::{json, Value};
use tokio::sync::Mutex;

fn config() -> ProviderConfig {
    ProviderConfig::builder()
        .prefix(ApiPrefix::new("/api").unwrap())
        .build()
        .unwrap()
}

// ============================================================================
// Request Shape
// ============================================================================

#[tokio::test]
async fn test_bulk_patches_bulk_endpoint_with_ordered_operations() {
    let recorded: Arc<Mutex<Vec<TransportRequest>>> = Arc::default();
    let sink = Arc::clone(&recorded);
    let transport = move |request: TransportRequest| {
        let sink = Arc::clone(&sink);
        async move {
            sink.lock().await.push(request);
            Ok::<Value, TransportError>(json!({"operations": [
                {"data": {"type": "notes", "id": "1"}},
                {"data": []},
                {}
            ]}))
        }
    };
    let provider = NetworkResourceProvider::new(config(), transport, NoPagination);

    let new_note = Resource::new("notes").with_attribute("title", json!("Bulk"));
    let lid = new_note.lid.clone().unwrap();
    let operations = vec![
        Operation::add_one("notes", new_note),
        Operation::get_many("notes").with_params(QueryParams::new().sort(SortTerm::desc("title"))),
        Operation::remove_relationship(
            "notes",
            "7",
            "tags",
            vec![ResourceIdentifier::new("tags", "1")],
        ),
    ];

    provider.bulk(operations).await.unwrap();

    let requests = recorded.lock().await;
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, HttpMethod::Patch);
    assert_eq!(request.url, "/api/bulk");
    assert_eq!(
        request.body,
        Some(json!({"operations": [
            {
                "op": "add",
                "ref": {"type": "notes"},
                "data": {"type": "notes", "lid": lid, "attributes": {"title": "Bulk"}}
            },
            {
                "op": "get",
                "ref": {"type": "notes"},
                "params": {"sort": "-title"}
            },
            {
                "op": "remove",
                "ref": {"type": "notes", "id": "7", "relationship": "tags"},
                "data": [{"type": "tags", "id": "1"}]
            }
        ]}))
    );
}

#[tokio::test]
async fn test_empty_bulk_makes_no_request() {
    let transport = |_: TransportRequest| async {
        Err::<Value, TransportError>(TransportError::other("must not be called"))
    };
    let provider = NetworkResourceProvider::new(config(), transport, NoPagination);

    let response = provider.bulk(Vec::new()).await.unwrap();

    assert!(response.entries().is_empty());
}

// ============================================================================
// Positional Fidelity
// ============================================================================

#[tokio::test]
async fn test_results_bind_to_operations_by_position() {
    let transport = |_: TransportRequest| async {
        Ok::<Value, TransportError>(json!({"operations": [
            {"data": {"type": "notes", "id": "A"}},
            {"data": {"type": "people", "id": "B"}}
        ]}))
    };
    let provider = NetworkResourceProvider::new(config(), transport, NoPagination);

    let response = provider
        .bulk(vec![
            Operation::get_one("notes", "A"),
            Operation::get_one("people", "B"),
        ])
        .await
        .unwrap();

    let entries = response.into_result().unwrap();
    assert_eq!(entries.len(), 2);
    for entry in &entries {
        let document = entry.decode::<Option<Resource>>().unwrap();
        let resource = document.into_result().unwrap().data.unwrap();
        assert_eq!(resource.resource_type, entry.operation.target().resource_type());
    }
}

#[tokio::test]
async fn test_per_entry_error_documents_are_kept_in_place() {
    let transport = |_: TransportRequest| async {
        Ok::<Value, TransportError>(json!({"operations": [
            {"data": null},
            {"errors": [{"status": "404"}]}
        ]}))
    };
    let provider = NetworkResourceProvider::new(config(), transport, NoPagination);

    let response = provider
        .bulk(vec![
            Operation::remove_one("notes", "1"),
            Operation::remove_one("notes", "2"),
        ])
        .await
        .unwrap();

    let entries = response.entries();
    assert_eq!(entries[0].operation.kind(), OperationKind::RemoveOne);
    assert!(!entries[0].result.is_errors());
    assert!(entries[1].result.is_errors());
}

#[tokio::test]
async fn test_length_mismatch_is_an_error() {
    let transport = |_: TransportRequest| async {
        Ok::<Value, TransportError>(json!({"operations": [{"data": null}]}))
    };
    let provider = NetworkResourceProvider::new(config(), transport, NoPagination);

    let error = provider
        .bulk(vec![
            Operation::get_one("notes", "1"),
            Operation::get_one("notes", "2"),
        ])
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        ProviderError::BulkLengthMismatch {
            expected: 2,
            actual: 1
        }
    ));
}

#[tokio::test]
async fn test_whole_request_rejection() {
    let transport = |_: TransportRequest| async {
        Ok::<Value, TransportError>(json!({"errors": [{"status": "409", "title": "Conflict"}]}))
    };
    let provider = NetworkResourceProvider::new(config(), transport, NoPagination);

    let response = provider
        .bulk(vec![Operation::add_one("notes", Resource::new("notes"))])
        .await
        .unwrap();

    match response {
        BulkResponse::Errors(errors) => {
            assert_eq!(errors.errors[0].title.as_deref(), Some("Conflict"));
        }
        BulkResponse::Operations(_) => panic!("expected a rejected bulk request"),
    }
}

#[tokio::test]
async fn test_bulk_transport_failure_propagates() {
    let transport = |_: TransportRequest| async {
        Err::<Value, TransportError>(TransportError::other("gateway timeout"))
    };
    let provider = NetworkResourceProvider::new(config(), transport, NoPagination);

    let error = provider
        .bulk(vec![Operation::get_many("notes")])
        .await
        .unwrap_err();

    assert!(matches!(error, ProviderError::Transport(_)));
}

#[tokio::test]
async fn test_decoded_entry_matches_document_shape() {
    let transport = |_: TransportRequest| async {
        Ok::<Value, TransportError>(json!({"operations": [
            {"data": [{"type": "tags", "id": "1"}]}
        ]}))
    };
    let provider = NetworkResourceProvider::new(config(), transport, NoPagination);

    let response = provider
        .bulk(vec![Operation::get_relationship("notes", "1", "tags")])
        .await
        .unwrap();

    let linkage = response.entries()[0]
        .decode::<jsonapi_provider::RelationshipData>()
        .unwrap();
    match linkage {
        Document::Data(doc) => assert_eq!(doc.data.identifiers().len(), 1),
        Document::Errors(_) => panic!("expected linkage"),
    }
}
