//! Pagination composers.
//!
//! Deployments paginate differently (offset, page number, cursor), so the
//! encoding of a page descriptor into query pairs is a pluggable strategy.
//! A composer returns bare keys; the query composer wraps each one as
//! `page[<key>]`.
//!
//! # Example
//!
//! ```rust
//! use jsonapi_provider::query::{OffsetPage, OffsetPagination, PaginationComposer};
//!
//! let pairs = OffsetPagination.compose(&OffsetPage::new(20).limit(10));
//! assert_eq!(
//!     pairs,
//!     vec![
//!         ("offset".to_string(), "20".to_string()),
//!         ("limit".to_string(), "10".to_string()),
//!     ]
//! );
//! ```

/// Converts a page descriptor into ordered key/value pairs.
///
/// Implementations must be pure: composing the same page twice yields the
/// same pairs in the same order.
pub trait PaginationComposer: Send + Sync {
    /// The page descriptor understood by this composer.
    type Page: Clone + Send + Sync;

    /// Returns the pairs for `page`, with keys not yet wrapped in `page[...]`.
    fn compose(&self, page: &Self::Page) -> Vec<(String, String)>;
}

/// Composer for deployments without pagination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoPagination;

impl PaginationComposer for NoPagination {
    type Page = ();

    fn compose(&self, _: &()) -> Vec<(String, String)> {
        Vec::new()
    }
}

/// An offset/limit page descriptor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OffsetPage {
    /// Number of records to skip.
    pub offset: u64,
    /// Maximum number of records to return.
    pub limit: Option<u64>,
}

impl OffsetPage {
    /// Creates a page starting at `offset` with the server's default limit.
    #[must_use]
    pub const fn new(offset: u64) -> Self {
        Self {
            offset,
            limit: None,
        }
    }

    /// Sets the page size.
    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Encodes [`OffsetPage`] as `page[offset]` and `page[limit]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OffsetPagination;

impl PaginationComposer for OffsetPagination {
    type Page = OffsetPage;

    fn compose(&self, page: &OffsetPage) -> Vec<(String, String)> {
        let mut pairs = vec![("offset".to_string(), page.offset.to_string())];
        if let Some(limit) = page.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }
}

/// A page-number page descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NumberedPage {
    /// The 1-based page number.
    pub number: u64,
    /// Records per page.
    pub size: Option<u64>,
}

impl NumberedPage {
    /// Creates a descriptor for page `number` with the server's default size.
    #[must_use]
    pub const fn new(number: u64) -> Self {
        Self { number, size: None }
    }

    /// Sets the page size.
    #[must_use]
    pub const fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }
}

/// Encodes [`NumberedPage`] as `page[number]` and `page[size]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PageNumberPagination;

impl PaginationComposer for PageNumberPagination {
    type Page = NumberedPage;

    fn compose(&self, page: &NumberedPage) -> Vec<(String, String)> {
        let mut pairs = vec![("number".to_string(), page.number.to_string())];
        if let Some(size) = page.size {
            pairs.push(("size".to_string(), size.to_string()));
        }
        pairs
    }
}

/// A cursor page descriptor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CursorPage {
    /// Return records after this cursor.
    pub after: Option<String>,
    /// Return records before this cursor.
    pub before: Option<String>,
    /// Records per page.
    pub size: Option<u64>,
}

impl CursorPage {
    /// A descriptor for the first page.
    #[must_use]
    pub const fn first() -> Self {
        Self {
            after: None,
            before: None,
            size: None,
        }
    }

    /// A descriptor for the page following `cursor`.
    #[must_use]
    pub fn after(cursor: impl Into<String>) -> Self {
        Self {
            after: Some(cursor.into()),
            ..Self::first()
        }
    }

    /// A descriptor for the page preceding `cursor`.
    #[must_use]
    pub fn before(cursor: impl Into<String>) -> Self {
        Self {
            before: Some(cursor.into()),
            ..Self::first()
        }
    }

    /// Sets the page size.
    #[must_use]
    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }
}

/// Encodes [`CursorPage`] as `page[after]`, `page[before]`, and `page[size]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CursorPagination;

impl PaginationComposer for CursorPagination {
    type Page = CursorPage;

    fn compose(&self, page: &CursorPage) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(after) = &page.after {
            pairs.push(("after".to_string(), after.clone()));
        }
        if let Some(before) = &page.before {
            pairs.push(("before".to_string(), before.clone()));
        }
        if let Some(size) = page.size {
            pairs.push(("size".to_string(), size.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    #[test]
    fn test_no_pagination_emits_nothing() {
        assert!(NoPagination.compose(&()).is_empty());
    }

    #[test]
    fn test_offset_without_limit() {
        assert_eq!(
            OffsetPagination.compose(&OffsetPage::new(0)),
            vec![pair("offset", "0")]
        );
    }

    #[test]
    fn test_page_number_with_size() {
        assert_eq!(
            PageNumberPagination.compose(&NumberedPage::new(3).size(25)),
            vec![pair("number", "3"), pair("size", "25")]
        );
    }

    #[test]
    fn test_cursor_first_page_with_size() {
        assert_eq!(
            CursorPagination.compose(&CursorPage::first().size(50)),
            vec![pair("size", "50")]
        );
    }

    #[test]
    fn test_cursor_after() {
        assert_eq!(
            CursorPagination.compose(&CursorPage::after("abc")),
            vec![pair("after", "abc")]
        );
    }

    #[test]
    fn test_cursor_before_and_size_order() {
        assert_eq!(
            CursorPagination.compose(&CursorPage::before("xyz").size(5)),
            vec![pair("before", "xyz"), pair("size", "5")]
        );
    }
}
