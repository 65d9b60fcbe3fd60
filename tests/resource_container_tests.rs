//! Integration tests for relationship resolution.
//!
//! These tests build containers from decoded documents and verify lookup
//! order, tolerance of partial inclusion, and the two lookup failures.

use jsonapi_provider::{
    ContainerError, DataDocument, Document, Resolved, Resource, ResourceContainer,
};
use serde_json::json;

/// A collection of two notes with authors and tags, partially side-loaded.
fn notes_document() -> DataDocument<Vec<Resource>> {
    let document: Document<Vec<Resource>> = serde_json::from_value(json!({
        "data": [
            {
                "type": "notes",
                "id": "1",
                "attributes": {"title": "Groceries"},
                "relationships": {
                    "author": {"data": {"type": "people", "id": "9"}},
                    "reviewer": {"data": null},
                    "tags": {"data": [
                        {"type": "tags", "id": "a"},
                        {"type": "tags", "id": "gone"},
                        {"type": "tags", "id": "b"}
                    ]}
                }
            },
            {
                "type": "notes",
                "id": "2",
                "relationships": {
                    "author": {"data": {"type": "people", "id": "10"}},
                    "tags": {"data": []}
                }
            }
        ],
        "included": [
            {"type": "tags", "id": "b", "attributes": {"name": "B"}},
            {
                "type": "people",
                "id": "9",
                "attributes": {"name": "Ada"},
                "relationships": {"team": {"data": {"type": "teams", "id": "t"}}}
            },
            {"type": "tags", "id": "a", "attributes": {"name": "A"}},
            {"type": "teams", "id": "t", "attributes": {"name": "Core"}}
        ]
    }))
    .unwrap();

    document.into_result().unwrap()
}

fn ids(resolved: &Resolved<'_>) -> Vec<String> {
    resolved
        .resources()
        .iter()
        .filter_map(|resource| resource.id.clone())
        .collect()
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn test_single_relationship_resolves_to_included_target() {
    let document = notes_document();
    let container = document.container();

    let author = container.get_relationship("notes", "1", "author").unwrap();

    let person = author.as_one().unwrap();
    assert_eq!(person.attributes["name"], json!("Ada"));
}

#[test]
fn test_null_relationship_resolves_to_null() {
    let document = notes_document();
    let container = document.container();

    assert_eq!(
        container.get_relationship("notes", "1", "reviewer").unwrap(),
        Resolved::Null
    );
}

#[test]
fn test_not_included_single_target_is_missing() {
    let document = notes_document();
    let container = document.container();

    let author = container.get_relationship("notes", "2", "author").unwrap();

    match author {
        Resolved::Missing(identifier) => assert_eq!(identifier.to_string(), "people:10"),
        other => panic!("expected a missing target, got {other:?}"),
    }
}

#[test]
fn test_many_relationship_skips_missing_and_keeps_order() {
    let document = notes_document();
    let container = document.container();

    let tags = container.get_relationship("notes", "1", "tags").unwrap();

    assert_eq!(ids(&tags), vec!["a", "b"]);
}

#[test]
fn test_empty_many_relationship_is_valid() {
    let document = notes_document();
    let container = document.container();

    assert_eq!(
        container.get_relationship("notes", "2", "tags").unwrap(),
        Resolved::Many(Vec::new())
    );
}

#[test]
fn test_included_resource_can_own_relationships() {
    let document = notes_document();
    let container = document.container();

    let team = container.get_relationship("people", "9", "team").unwrap();

    assert_eq!(ids(&team), vec!["t"]);
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_undeclared_relationship() {
    let document = notes_document();
    let container = document.container();

    let error = container
        .get_relationship("notes", "2", "reviewer")
        .unwrap_err();

    assert_eq!(
        error,
        ContainerError::RelationshipNotDeclared {
            resource_type: "notes".to_string(),
            id: "2".to_string(),
            relationship: "reviewer".to_string(),
        }
    );
}

#[test]
fn test_resource_not_found() {
    let document = notes_document();
    let container = document.container();

    let error = container.get_relationship("notes", "3", "author").unwrap_err();

    assert_eq!(
        error,
        ContainerError::ResourceNotFound {
            resource_type: "notes".to_string(),
            id: "3".to_string(),
        }
    );
    assert!(error.to_string().contains("notes"));
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_equal_inputs_resolve_identically() {
    let first = notes_document();
    let second = notes_document();

    let a = first.container().get_relationship("notes", "1", "tags").unwrap();
    let b = second.container().get_relationship("notes", "1", "tags").unwrap();

    assert_eq!(a, b);
    assert_eq!(first.container(), second.container());
}

#[test]
fn test_single_resource_document_container() {
    let document: Document<Resource> = serde_json::from_value(json!({
        "data": {
            "type": "notes",
            "id": "1",
            "relationships": {"author": {"data": {"type": "people", "id": "9"}}}
        },
        "included": [{"type": "people", "id": "9"}]
    }))
    .unwrap();

    let data = document.into_result().unwrap();
    let container = data.container();
    let author = container.get_relationship("notes", "1", "author").unwrap();

    assert_eq!(author.as_one().and_then(|person| person.id.as_deref()), Some("9"));
}

#[test]
fn test_container_from_slices() {
    let primary = vec![Resource::with_id("notes", "1")];
    let included = vec![Resource::with_id("notes", "1").with_attribute("title", json!("dup"))];
    let container = ResourceContainer::new(&primary, &included);

    let found = container.find("notes", "1").unwrap();
    assert!(found.attributes.is_empty());
}
