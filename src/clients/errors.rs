//! Transport-level error types.
//!
//! These errors describe failures to complete one HTTP exchange. They are
//! produced by a [`Transport`](crate::clients::Transport) and propagated
//! unchanged by every provider operation; the provider never retries or
//! reinterprets them.
//!
//! # Error Handling
//!
//! - [`HttpResponseError`]: a non-2xx response without a JSON:API error body
//! - [`InvalidRequestError`]: a request that fails validation before sending
//! - [`TransportError`]: unified error type for everything a transport can raise
//!
//! # Example
//!
//! ```rust,ignore
//! use jsonapi_provider::clients::TransportError;
//!
//! match provider.get_one("notes", "1", QueryParams::new()).await {
//!     Ok(document) => { /* data or protocol errors */ }
//!     Err(ProviderError::Transport(TransportError::Response(e))) => {
//!         println!("HTTP {}: {}", e.code, e.message);
//!     }
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```

use thiserror::Error;

/// Error returned when a request receives a non-successful response whose
/// body is not a JSON:API error document.
///
/// # Example
///
/// ```rust
/// use jsonapi_provider::clients::HttpResponseError;
///
/// let error = HttpResponseError {
///     code: 502,
///     message: "Bad Gateway".to_string(),
///     error_reference: Some("abc-123".to_string()),
/// };
///
/// assert!(error.to_string().contains("502"));
/// ```
#[derive(Debug, Error)]
#[error("HTTP {code}: {message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// The raw response body, or the status reason when the body was empty.
    pub message: String,
    /// Reference ID for error reporting (from the X-Request-Id header).
    pub error_reference: Option<String>,
}

/// Error returned when a transport request fails validation.
///
/// Raised before a request is sent if:
/// - a POST or PATCH request has no body
/// - a GET request carries a body
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidRequestError {
    /// A POST or PATCH request was built without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// A GET request was built with a body.
    #[error("Cannot send a body with {method}.")]
    UnexpectedBody {
        /// The HTTP method that forbids a body.
        method: String,
    },
}

/// Unified error type for transport failures.
///
/// Injected transports that are not built on `reqwest` report their own
/// failures through [`TransportError::Other`].
#[derive(Debug, Error)]
pub enum TransportError {
    /// A non-2xx response without a JSON:API error body.
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body is not valid JSON.
    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A failure reported by a custom transport.
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    /// Wraps an arbitrary error raised by a custom transport.
    pub fn other(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Other(error.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_response_error_includes_status_code_in_message() {
        let error = HttpResponseError {
            code: 404,
            message: "Not Found".to_string(),
            error_reference: None,
        };
        assert_eq!(error.to_string(), "HTTP 404: Not Found");
    }

    #[test]
    fn test_invalid_request_error_missing_body() {
        let error = InvalidRequestError::MissingBody {
            method: "PATCH".to_string(),
        };
        assert_eq!(error.to_string(), "Cannot use PATCH without specifying data.");
    }

    #[test]
    fn test_other_wraps_string_errors() {
        let error = TransportError::other("connection reset");
        assert!(matches!(error, TransportError::Other(_)));
        assert_eq!(error.to_string(), "connection reset");
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let response: &dyn std::error::Error = &HttpResponseError {
            code: 400,
            message: "test".to_string(),
            error_reference: None,
        };
        let _ = response;

        let invalid: &dyn std::error::Error = &InvalidRequestError::UnexpectedBody {
            method: "GET".to_string(),
        };
        let _ = invalid;
    }
}
