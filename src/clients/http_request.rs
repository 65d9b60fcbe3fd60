//! Transport request types.
//!
//! This module provides the [`TransportRequest`] handed to a
//! [`Transport`](crate::clients::Transport), and its builder.

use std::fmt;

use indexmap::IndexMap;

use crate::clients::errors::InvalidRequestError;

/// HTTP methods used by the JSON:API protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// Fetch a resource, collection, or relationship.
    Get,
    /// Create a resource or append to a to-many relationship.
    Post,
    /// Update a resource or relationship, or submit a bulk request.
    Patch,
    /// Remove a resource or detach members of a to-many relationship.
    Delete,
}

impl HttpMethod {
    /// Returns the method name as it appears on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One HTTP exchange as seen by a transport.
///
/// `url` is the full request target built by the provider: the configured
/// prefix, the resource path, and the query string.
///
/// # Example
///
/// ```rust
/// use jsonapi_provider::clients::{HttpMethod, TransportRequest};
/// use serde_json::json;
///
/// let request = TransportRequest::builder(HttpMethod::Patch, "/api/notes/1?")
///     .header("Content-Type", "application/vnd.api+json")
///     .body(json!({"data": {"type": "notes", "id": "1"}}))
///     .build()
///     .unwrap();
///
/// assert_eq!(request.method, HttpMethod::Patch);
/// assert!(request.body.is_some());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TransportRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The request target.
    pub url: String,
    /// Request headers, in insertion order.
    pub headers: IndexMap<String, String>,
    /// The JSON body, if any.
    pub body: Option<serde_json::Value>,
}

impl TransportRequest {
    /// Creates a new builder for a request.
    #[must_use]
    pub fn builder(method: HttpMethod, url: impl Into<String>) -> TransportRequestBuilder {
        TransportRequestBuilder::new(method, url)
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRequestError`] if:
    /// - `method` is `Post` or `Patch` but `body` is `None`
    /// - `method` is `Get` but `body` is `Some`
    pub fn verify(&self) -> Result<(), InvalidRequestError> {
        if matches!(self.method, HttpMethod::Post | HttpMethod::Patch) && self.body.is_none() {
            return Err(InvalidRequestError::MissingBody {
                method: self.method.to_string(),
            });
        }

        if self.method == HttpMethod::Get && self.body.is_some() {
            return Err(InvalidRequestError::UnexpectedBody {
                method: self.method.to_string(),
            });
        }

        Ok(())
    }
}

/// Builder for constructing [`TransportRequest`] instances.
#[derive(Debug)]
pub struct TransportRequestBuilder {
    method: HttpMethod,
    url: String,
    headers: IndexMap<String, String>,
    body: Option<serde_json::Value>,
}

impl TransportRequestBuilder {
    fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: IndexMap::new(),
            body: None,
        }
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Adds a single header, replacing any earlier value for the same name.
    ///
    /// Names are compared case-insensitively.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        set_header(&mut self.headers, name.into(), value.into());
        self
    }

    /// Adds every header from `headers`.
    #[must_use]
    pub fn headers<'a>(mut self, headers: impl IntoIterator<Item = (&'a String, &'a String)>) -> Self {
        for (name, value) in headers {
            set_header(&mut self.headers, name.clone(), value.clone());
        }
        self
    }

    /// Builds the [`TransportRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRequestError`] if the request fails validation.
    pub fn build(self) -> Result<TransportRequest, InvalidRequestError> {
        let request = TransportRequest {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        };
        request.verify()?;
        Ok(request)
    }
}

/// Inserts a header, replacing the value of an existing header whose name
/// matches ignoring ASCII case. The first spelling of the name is kept.
pub(crate) fn set_header(headers: &mut IndexMap<String, String>, name: String, value: String) {
    match headers
        .iter_mut()
        .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
    {
        Some((_, existing)) => *existing = value,
        None => {
            headers.insert(name, value);
        }
    }
}
