//! Default HTTP transport built on `reqwest`.
//!
//! This module provides [`ReqwestTransport`], the transport used when the
//! caller does not inject their own.

use async_trait::async_trait;
use serde_json::Value;

use crate::clients::errors::{HttpResponseError, TransportError};
use crate::clients::http_request::{HttpMethod, TransportRequest};
use crate::clients::transport::Transport;

/// HTTP transport over `reqwest`.
///
/// The transport:
/// - prefixes each request target with a base URI (`https://host`)
/// - sends headers and the JSON body as given
/// - decodes an empty body (e.g. `204 No Content`) as `{}`
/// - returns non-2xx responses carrying a JSON:API `errors` member as
///   successful bodies, so they reach callers as protocol-level errors
/// - reports any other non-2xx response as [`TransportError::Response`]
///
/// # Thread Safety
///
/// `ReqwestTransport` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use jsonapi_provider::clients::ReqwestTransport;
///
/// let transport = ReqwestTransport::new("https://example.com")?;
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Base URI (e.g., `https://example.com`).
    base_uri: String,
}

// Verify ReqwestTransport is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ReqwestTransport>();
};

impl ReqwestTransport {
    /// Creates a transport with a default rustls-backed client.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Network`] if the client cannot be created
    /// (e.g., TLS initialization failure).
    pub fn new(base_uri: impl Into<String>) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().use_rustls_tls().build()?;
        Ok(Self::with_client(client, base_uri))
    }

    /// Creates a transport around an existing client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_uri: impl Into<String>) -> Self {
        let base_uri = base_uri.into();
        let base_uri = base_uri.trim_end_matches('/').to_string();
        Self { client, base_uri }
    }

    /// Returns the base URI for this transport.
    #[must_use]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    fn is_error_document(body: &Value) -> bool {
        body.as_object().is_some_and(|map| map.contains_key("errors"))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<Value, TransportError> {
        let url = format!("{}{}", self.base_uri, request.url);

        let mut req_builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Patch => self.client.patch(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        for (name, value) in &request.headers {
            req_builder = req_builder.header(name, value);
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_string());
        }

        let res = req_builder.send().await?;

        let status = res.status();
        let request_id = res
            .headers()
            .get("x-request-id")
            .and_then(|value| value.to_str().ok())
            .map(String::from);
        let body_text = res.text().await?;

        if status.is_success() {
            if body_text.trim().is_empty() {
                return Ok(Value::Object(serde_json::Map::new()));
            }
            return Ok(serde_json::from_str(&body_text)?);
        }

        tracing::warn!(
            "{} {} returned status {}",
            request.method,
            request.url,
            status.as_u16()
        );

        if let Ok(body) = serde_json::from_str::<Value>(&body_text) {
            if Self::is_error_document(&body) {
                return Ok(body);
            }
        }

        let message = if body_text.is_empty() {
            status.canonical_reason().unwrap_or_default().to_string()
        } else {
            body_text
        };

        Err(TransportError::Response(HttpResponseError {
            code: status.as_u16(),
            message,
            error_reference: request_id,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_base_uri_trailing_slash_is_trimmed() {
        let transport =
            ReqwestTransport::with_client(reqwest::Client::new(), "https://example.com/");
        assert_eq!(transport.base_uri(), "https://example.com");
    }

    #[test]
    fn test_error_document_detection() {
        assert!(ReqwestTransport::is_error_document(&json!({"errors": []})));
        assert!(!ReqwestTransport::is_error_document(&json!({"data": null})));
        assert!(!ReqwestTransport::is_error_document(&json!("errors")));
    }

    #[test]
    fn test_transport_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReqwestTransport>();
    }
}
