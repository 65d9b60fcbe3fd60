//! Integration tests for query composition.
//!
//! These tests verify pair order, filter repetition, pagination delegation,
//! encoding, and determinism of composed query strings.

use jsonapi_provider::query::{
    compose, encode_query, CursorPage, CursorPagination, IncludePath, NoPagination, NumberedPage,
    OffsetPage, OffsetPagination, PageNumberPagination, PaginationComposer, QueryParams,
    SortTerm,
};

/// Composes and encodes `params` with `composer`.
fn query_string<C: PaginationComposer>(params: &QueryParams<C::Page>, composer: &C) -> String {
    encode_query(&compose(params, composer))
}

// ============================================================================
// Pair Order
// ============================================================================

#[test]
fn test_fields_sort_include_in_fixed_order() {
    let params = QueryParams::<()>::new()
        .fields("notes", ["title", "text"])
        .sort(SortTerm::desc("title"))
        .include(IncludePath::new(["author"]))
        .include(IncludePath::new(["tags", "name"]));

    assert_eq!(
        query_string(&params, &NoPagination),
        "fields[notes]=title,text&sort=-title&include=author,tags.name"
    );
}

#[test]
fn test_all_members_in_fixed_order_regardless_of_builder_order() {
    let params = QueryParams::new()
        .include("author")
        .sort(SortTerm::asc("created"))
        .page(NumberedPage::new(2).size(25))
        .filter("status", "published")
        .fields("notes", ["title"]);

    let keys: Vec<String> = compose(&params, &PageNumberPagination)
        .into_iter()
        .map(|(key, _)| key)
        .collect();

    assert_eq!(
        keys,
        vec![
            "fields[notes]",
            "filter[status]",
            "page[number]",
            "page[size]",
            "sort",
            "include",
        ]
    );
}

#[test]
fn test_fieldsets_keep_insertion_order() {
    let params = QueryParams::<()>::new()
        .fields("people", ["name"])
        .fields("notes", ["title"])
        .fields("tags", ["label"]);

    assert_eq!(
        query_string(&params, &NoPagination),
        "fields[people]=name&fields[notes]=title&fields[tags]=label"
    );
}

#[test]
fn test_sort_preserves_caller_order() {
    let params = QueryParams::<()>::new()
        .sort(SortTerm::desc("created"))
        .sort(SortTerm::asc("title"))
        .sort(SortTerm::desc("author.name"));

    assert_eq!(
        query_string(&params, &NoPagination),
        "sort=-created,title,-author.name"
    );
}

// ============================================================================
// Filters
// ============================================================================

#[test]
fn test_filter_list_repeats_key() {
    let params = QueryParams::<()>::new().filter("tag", ["a", "b"]);

    assert_eq!(
        compose(&params, &NoPagination),
        vec![
            ("filter[tag]".to_string(), "a".to_string()),
            ("filter[tag]".to_string(), "b".to_string()),
        ]
    );
    assert_eq!(query_string(&params, &NoPagination), "filter[tag]=a&filter[tag]=b");
}

#[test]
fn test_empty_filter_and_no_filter_emit_nothing() {
    let filterable = QueryParams::<()>::new().filterable();
    let plain = QueryParams::<()>::new();

    assert!(filterable.filter.is_some());
    assert!(plain.filter.is_none());
    assert!(compose(&filterable, &NoPagination).is_empty());
    assert!(compose(&plain, &NoPagination).is_empty());
}

#[test]
fn test_empty_sort_is_omitted() {
    let params = QueryParams::<()>::new().sortable();
    assert_eq!(query_string(&params, &NoPagination), "");
}

#[test]
fn test_filter_values_are_percent_encoded() {
    let params = QueryParams::<()>::new().filter("title", "a&b=c d");
    assert_eq!(
        query_string(&params, &NoPagination),
        "filter[title]=a%26b%3Dc%20d"
    );
}

// ============================================================================
// Pagination
// ============================================================================

#[test]
fn test_offset_pagination() {
    let params = QueryParams::new().page(OffsetPage::new(40).limit(20));
    assert_eq!(
        query_string(&params, &OffsetPagination),
        "page[offset]=40&page[limit]=20"
    );
}

#[test]
fn test_cursor_pagination() {
    let params = QueryParams::new().page(CursorPage::after("eyJpZCI6MTB9").size(10));
    assert_eq!(
        query_string(&params, &CursorPagination),
        "page[after]=eyJpZCI6MTB9&page[size]=10"
    );
}

#[test]
fn test_custom_pagination_composer() {
    struct Since;

    impl PaginationComposer for Since {
        type Page = u64;

        fn compose(&self, page: &u64) -> Vec<(String, String)> {
            vec![("since".to_string(), page.to_string())]
        }
    }

    let params = QueryParams::new().page(1_700_000_000_u64).include("author");
    assert_eq!(
        query_string(&params, &Since),
        "page[since]=1700000000&include=author"
    );
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_composing_twice_is_byte_identical() {
    let params = QueryParams::new()
        .fields("notes", ["title", "text"])
        .fields("people", ["name"])
        .filter("tag", ["a", "b"])
        .filter("status", "draft")
        .page(OffsetPage::new(0).limit(50))
        .sort(SortTerm::desc("title"))
        .include("author")
        .include("tags.name");

    let first = query_string(&params, &OffsetPagination);
    let second = query_string(&params.clone(), &OffsetPagination);

    assert_eq!(first, second);
}
