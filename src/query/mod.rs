//! Query composition.
//!
//! This module turns a structured [`QueryParams`] into the ordered
//! `(key, value)` pairs of a JSON:API query string.
//!
//! # Composition Order
//!
//! Pairs are emitted in a fixed order so that identical input always yields
//! byte-identical output:
//!
//! 1. `fields[<type>]` per sparse fieldset, values comma-joined
//! 2. `filter[<key>]` per filter, one pair per value for multi-valued filters
//! 3. `page[<key>]` per pair returned by the [`PaginationComposer`]
//! 4. `sort`, terms comma-joined, `-` prefix for descending
//! 5. `include`, paths dot-joined then comma-joined
//!
//! # Example
//!
//! ```rust
//! use jsonapi_provider::query::{compose, encode_query, NoPagination, QueryParams, SortTerm};
//!
//! let params = QueryParams::<()>::new()
//!     .fields("notes", ["title", "text"])
//!     .sort(SortTerm::desc("title"))
//!     .include("author")
//!     .include("tags.name");
//!
//! let pairs = compose(&params, &NoPagination);
//! assert_eq!(encode_query(&pairs), "fields[notes]=title,text&sort=-title&include=author,tags.name");
//! ```

mod pagination;

pub use pagination::{
    CursorPage, CursorPagination, NoPagination, NumberedPage, OffsetPage, OffsetPagination,
    PageNumberPagination, PaginationComposer,
};

use std::fmt;

use indexmap::IndexMap;

/// The value of one filter.
///
/// A multi-valued filter repeats its key once per value instead of
/// comma-joining, so servers can apply OR semantics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterValue {
    /// A single value.
    Single(String),
    /// Several values, each emitted as its own pair.
    Any(Vec<String>),
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        Self::Any(values)
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(values: Vec<&str>) -> Self {
        Self::Any(values.into_iter().map(ToString::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for FilterValue {
    fn from(values: [&str; N]) -> Self {
        Self::Any(values.iter().map(ToString::to_string).collect())
    }
}

/// One sort criterion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortTerm {
    /// The field to sort by.
    pub field: String,
    /// `true` for ascending order.
    pub ascending: bool,
}

impl SortTerm {
    /// Ascending order on `field`.
    #[must_use]
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: true,
        }
    }

    /// Descending order on `field`.
    #[must_use]
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: false,
        }
    }
}

impl fmt::Display for SortTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ascending {
            f.write_str(&self.field)
        } else {
            write!(f, "-{}", self.field)
        }
    }
}

/// A relationship path to side-load, such as `tags.name`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IncludePath(Vec<String>);

impl IncludePath {
    /// Creates a path from its relationship names.
    #[must_use]
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Returns the relationship names in order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for IncludePath {
    fn from(path: &str) -> Self {
        Self::new(path.split('.').filter(|segment| !segment.is_empty()))
    }
}

impl fmt::Display for IncludePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// Structured query parameters for one operation.
///
/// `filter` and `sort` are `Option`s: `None` means the query has no filtering
/// or sorting capability at all, which is distinct from an empty filter.
/// Neither emits pairs, but schema validation and serialization of bulk
/// operations keep the distinction.
///
/// `P` is the page descriptor type of the provider's [`PaginationComposer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryParams<P = ()> {
    /// Sparse fieldsets keyed by resource type, in insertion order.
    pub fields: IndexMap<String, Vec<String>>,
    /// Filters keyed by filter name, in insertion order.
    pub filter: Option<IndexMap<String, FilterValue>>,
    /// Sort criteria in priority order.
    pub sort: Option<Vec<SortTerm>>,
    /// Page descriptor.
    pub page: Option<P>,
    /// Relationship paths to side-load.
    pub include: Vec<IncludePath>,
}

impl<P> Default for QueryParams<P> {
    fn default() -> Self {
        Self {
            fields: IndexMap::new(),
            filter: None,
            sort: None,
            page: None,
            include: Vec::new(),
        }
    }
}

impl<P> QueryParams<P> {
    /// Creates empty parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the fields returned for `resource_type`.
    #[must_use]
    pub fn fields<I, S>(mut self, resource_type: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.insert(
            resource_type.into(),
            names.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Declares filtering capability without adding a filter.
    #[must_use]
    pub fn filterable(mut self) -> Self {
        self.filter.get_or_insert_with(IndexMap::new);
        self
    }

    /// Adds a filter.
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filter
            .get_or_insert_with(IndexMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Declares sorting capability without adding a criterion.
    #[must_use]
    pub fn sortable(mut self) -> Self {
        self.sort.get_or_insert_with(Vec::new);
        self
    }

    /// Appends a sort criterion.
    #[must_use]
    pub fn sort(mut self, term: SortTerm) -> Self {
        self.sort.get_or_insert_with(Vec::new).push(term);
        self
    }

    /// Sets the page descriptor.
    #[must_use]
    pub fn page(mut self, page: P) -> Self {
        self.page = Some(page);
        self
    }

    /// Appends a relationship path to side-load.
    #[must_use]
    pub fn include(mut self, path: impl Into<IncludePath>) -> Self {
        self.include.push(path.into());
        self
    }

    /// Composes these parameters into query pairs.
    #[must_use]
    pub fn compose<C>(&self, composer: &C) -> Vec<(String, String)>
    where
        C: PaginationComposer<Page = P> + ?Sized,
    {
        compose(self, composer)
    }
}

/// Composes query parameters into ordered `(key, value)` pairs.
///
/// Values are returned raw; see [`encode_query`] for the string form.
#[must_use]
pub fn compose<C>(params: &QueryParams<C::Page>, composer: &C) -> Vec<(String, String)>
where
    C: PaginationComposer + ?Sized,
{
    let mut pairs = Vec::new();

    for (resource_type, names) in &params.fields {
        pairs.push((format!("fields[{resource_type}]"), names.join(",")));
    }

    if let Some(filter) = &params.filter {
        for (key, value) in filter {
            match value {
                FilterValue::Single(value) => pairs.push((format!("filter[{key}]"), value.clone())),
                FilterValue::Any(values) => {
                    for value in values {
                        pairs.push((format!("filter[{key}]"), value.clone()));
                    }
                }
            }
        }
    }

    if let Some(page) = &params.page {
        for (key, value) in composer.compose(page) {
            pairs.push((format!("page[{key}]"), value));
        }
    }

    if let Some(sort) = params.sort.as_ref().filter(|terms| !terms.is_empty()) {
        let terms: Vec<String> = sort.iter().map(ToString::to_string).collect();
        pairs.push(("sort".to_string(), terms.join(",")));
    }

    if !params.include.is_empty() {
        let paths: Vec<String> = params.include.iter().map(ToString::to_string).collect();
        pairs.push(("include".to_string(), paths.join(",")));
    }

    pairs
}

/// Flattens query pairs into a query string without the leading `?`.
///
/// Keys and values are percent-encoded, except for the characters JSON:API
/// uses structurally (`[`, `]`, `,`, `.`), which are kept literal.
#[must_use]
pub fn encode_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Percent-encodes one path segment.
#[must_use]
pub fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

fn encode_component(component: &str) -> String {
    urlencoding::encode(component)
        .replace("%5B", "[")
        .replace("%5D", "]")
        .replace("%2C", ",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    #[test]
    fn test_empty_params_compose_to_nothing() {
        let params = QueryParams::<()>::new();
        assert!(compose(&params, &NoPagination).is_empty());
    }

    #[test]
    fn test_fields_are_comma_joined_per_type() {
        let params = QueryParams::<()>::new()
            .fields("notes", ["title", "text"])
            .fields("people", ["name"]);

        assert_eq!(
            compose(&params, &NoPagination),
            vec![pair("fields[notes]", "title,text"), pair("fields[people]", "name")]
        );
    }

    #[test]
    fn test_multi_valued_filter_repeats_key() {
        let params = QueryParams::<()>::new().filter("tag", ["a", "b"]);

        assert_eq!(
            compose(&params, &NoPagination),
            vec![pair("filter[tag]", "a"), pair("filter[tag]", "b")]
        );
    }

    #[test]
    fn test_empty_filter_and_sort_emit_nothing() {
        let params = QueryParams::<()>::new().filterable().sortable();
        assert!(compose(&params, &NoPagination).is_empty());
    }

    #[test]
    fn test_page_pairs_are_wrapped() {
        let params = QueryParams::new().page(OffsetPage::new(10).limit(5));

        assert_eq!(
            compose(&params, &OffsetPagination),
            vec![pair("page[offset]", "10"), pair("page[limit]", "5")]
        );
    }

    #[test]
    fn test_sort_preserves_caller_order() {
        let params = QueryParams::<()>::new()
            .sort(SortTerm::asc("priority"))
            .sort(SortTerm::desc("created"))
            .sort(SortTerm::asc("title"));

        assert_eq!(
            compose(&params, &NoPagination),
            vec![pair("sort", "priority,-created,title")]
        );
    }

    #[test]
    fn test_full_composition_order() {
        let params = QueryParams::new()
            .include("author")
            .sort(SortTerm::asc("title"))
            .page(NumberedPage::new(2))
            .filter("status", "open")
            .fields("notes", ["title"]);

        let keys: Vec<String> = compose(&params, &PageNumberPagination)
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        assert_eq!(
            keys,
            vec!["fields[notes]", "filter[status]", "page[number]", "sort", "include"]
        );
    }

    #[test]
    fn test_include_path_from_dotted_string() {
        let path = IncludePath::from("tags.name");
        assert_eq!(path.segments(), ["tags", "name"]);
        assert_eq!(path.to_string(), "tags.name");
    }

    #[test]
    fn test_encode_keeps_structural_characters() {
        let pairs = vec![pair("fields[notes]", "title,text"), pair("include", "tags.name")];
        assert_eq!(
            encode_query(&pairs),
            "fields[notes]=title,text&include=tags.name"
        );
    }

    #[test]
    fn test_encode_escapes_reserved_characters() {
        let pairs = vec![pair("filter[q]", "a&b=c d")];
        assert_eq!(encode_query(&pairs), "filter[q]=a%26b%3Dc%20d");
    }

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("a/b"), "a%2Fb");
        assert_eq!(encode_segment("note-12"), "note-12");
    }
}
