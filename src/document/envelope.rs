//! Top-level documents.
//!
//! A server payload is either a success document carrying `data` or an error
//! document carrying `errors`. The two shapes are mutually exclusive and are
//! modeled as the two variants of [`Document`], so callers branch with a
//! `match` rather than probing for members.
//!
//! # Example
//!
//! ```rust
//! use jsonapi_provider::{Document, Resource};
//! use serde_json::json;
//!
//! let raw = json!({"data": {"type": "notes", "id": "1"}});
//! let document = Document::from_value(raw).unwrap().decode::<Option<Resource>>().unwrap();
//!
//! match document {
//!     Document::Data(doc) => assert_eq!(doc.data.unwrap().id.as_deref(), Some("1")),
//!     Document::Errors(doc) => panic!("unexpected errors: {:?}", doc.errors),
//! }
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::{Links, Meta, Resource};

/// Errors raised while interpreting a decoded payload as a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The payload is not a JSON object.
    #[error("Document must be a JSON object, got {found}")]
    NotAnObject {
        /// The JSON kind that was found instead.
        found: &'static str,
    },

    /// The payload carries none of `data`, `errors`, or `meta`.
    #[error("Document contains none of 'data', 'errors', or 'meta'")]
    MissingPrimaryData,

    /// A bulk response carries neither `operations` nor `errors`.
    #[error("Bulk response contains neither 'operations' nor 'errors'")]
    MissingOperations,

    /// A member does not have the expected shape.
    #[error("Malformed document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The source of an error within the request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSource {
    /// A JSON pointer to the offending member of the request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,
    /// The query parameter that caused the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    /// The request header that caused the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
}

/// An error object.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    /// Unique identifier for this occurrence of the problem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// HTTP status code, as a string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Application-specific error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short summary of the problem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Explanation specific to this occurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Where in the request the problem originated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ErrorSource>,
    /// Error links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    /// Non-standard information about the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// A document whose top-level member is `errors`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorDocument {
    /// The reported errors.
    pub errors: Vec<ErrorObject>,
    /// Top-level links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    /// Top-level meta.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    /// The `jsonapi` object, preserved as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonapi: Option<Value>,
}

/// A document whose top-level member is `data`.
///
/// `T` is the shape of primary data for the operation that produced the
/// document: `Option<Resource>`, `Vec<Resource>`, `RelationshipData`, ...
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataDocument<T> {
    /// Primary data.
    pub data: T,
    /// Side-loaded resources.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<Resource>,
    /// Top-level links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    /// Top-level meta.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    /// The `jsonapi` object, preserved as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonapi: Option<Value>,
}

impl<T> DataDocument<T> {
    /// Creates a document with only primary data.
    #[must_use]
    pub const fn new(data: T) -> Self {
        Self {
            data,
            included: Vec::new(),
            links: None,
            meta: None,
            jsonapi: None,
        }
    }

    /// Replaces primary data while keeping the other top-level members.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> DataDocument<U> {
        DataDocument {
            data: f(self.data),
            included: self.included,
            links: self.links,
            meta: self.meta,
            jsonapi: self.jsonapi,
        }
    }

    /// Reads the pagination links from the top-level `links` member.
    #[must_use]
    pub fn pagination_links(&self) -> PaginationLinks {
        self.links
            .as_ref()
            .map(PaginationLinks::from_links)
            .unwrap_or_default()
    }
}

/// Pagination links of a collection document.
///
/// JSON:API carries pagination in the `first`, `prev`, `next`, and `last`
/// members of top-level `links`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaginationLinks {
    /// Link to the first page.
    pub first: Option<String>,
    /// Link to the previous page.
    pub prev: Option<String>,
    /// Link to the next page.
    pub next: Option<String>,
    /// Link to the last page.
    pub last: Option<String>,
}

impl PaginationLinks {
    /// Extracts pagination links from a `links` member.
    #[must_use]
    pub fn from_links(links: &Links) -> Self {
        let href = |name: &str| links.get(name).map(|link| link.href().to_string());
        Self {
            first: href("first"),
            prev: href("prev"),
            next: href("next"),
            last: href("last"),
        }
    }

    /// Returns `true` if a next page is linked.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.next.is_some()
    }

    /// Returns `true` if a previous page is linked.
    #[must_use]
    pub const fn has_prev_page(&self) -> bool {
        self.prev.is_some()
    }
}

/// A top-level document: success data or protocol-level errors.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Document<T> {
    /// A success document.
    Data(DataDocument<T>),
    /// An error document.
    Errors(ErrorDocument),
}

impl Document<Value> {
    /// Interprets a decoded payload as a document.
    ///
    /// A payload with an `errors` member is an error document; otherwise it
    /// must carry `data` or `meta`. A meta-only document, or an empty object
    /// (the decoding of an empty 204 response body), is a success document
    /// with `null` data.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] if the payload is not an object, carries
    /// none of `data`, `errors`, or `meta`, or a member is malformed.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let Value::Object(mut map) = value else {
            return Err(DocumentError::NotAnObject {
                found: json_kind(&value),
            });
        };

        if map.contains_key("errors") {
            let errors: ErrorDocument = serde_json::from_value(Value::Object(map))?;
            return Ok(Self::Errors(errors));
        }

        if !map.contains_key("data") {
            if !map.is_empty() && !map.contains_key("meta") {
                return Err(DocumentError::MissingPrimaryData);
            }
            map.insert("data".to_string(), Value::Null);
        }

        let data: DataDocument<Value> = serde_json::from_value(Value::Object(map))?;
        Ok(Self::Data(data))
    }

    /// Decodes primary data into the shape expected by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Malformed`] if `data` does not match `U`.
    pub fn decode<U: DeserializeOwned>(self) -> Result<Document<U>, DocumentError> {
        match self {
            Self::Errors(errors) => Ok(Document::Errors(errors)),
            Self::Data(DataDocument {
                data,
                included,
                links,
                meta,
                jsonapi,
            }) => Ok(Document::Data(DataDocument {
                data: serde_json::from_value(data)?,
                included,
                links,
                meta,
                jsonapi,
            })),
        }
    }
}

impl<T> Document<T> {
    /// Returns `true` for an error document.
    #[must_use]
    pub const fn is_errors(&self) -> bool {
        matches!(self, Self::Errors(_))
    }

    /// Returns the success document, if any.
    #[must_use]
    pub const fn as_data(&self) -> Option<&DataDocument<T>> {
        match self {
            Self::Data(doc) => Some(doc),
            Self::Errors(_) => None,
        }
    }

    /// Returns the error document, if any.
    #[must_use]
    pub const fn as_errors(&self) -> Option<&ErrorDocument> {
        match self {
            Self::Errors(doc) => Some(doc),
            Self::Data(_) => None,
        }
    }

    /// Converts into a `Result`, with protocol errors on the `Err` side.
    ///
    /// # Errors
    ///
    /// Returns the [`ErrorDocument`] if this is an error document.
    pub fn into_result(self) -> Result<DataDocument<T>, ErrorDocument> {
        match self {
            Self::Data(doc) => Ok(doc),
            Self::Errors(doc) => Err(doc),
        }
    }

    /// Applies `f` to the primary data of a success document.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Document<U> {
        match self {
            Self::Data(doc) => Document::Data(doc.map(f)),
            Self::Errors(doc) => Document::Errors(doc),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Document<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Document::<Value>::from_value(value)
            .and_then(Document::<Value>::decode::<T>)
            .map_err(serde::de::Error::custom)
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
