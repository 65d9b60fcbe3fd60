//! The transport boundary.
//!
//! A [`Transport`] performs exactly one HTTP exchange and returns the decoded
//! JSON body. Cancellation, timeouts, and retries belong to the transport;
//! the provider only propagates what the transport returns.
//!
//! Any async closure with the right signature is a transport:
//!
//! ```rust
//! use jsonapi_provider::clients::{Transport, TransportError, TransportRequest};
//! use serde_json::{json, Value};
//!
//! let transport = |request: TransportRequest| async move {
//!     assert!(request.url.starts_with("/api/"));
//!     Ok::<Value, TransportError>(json!({"data": null}))
//! };
//!
//! fn assert_transport<T: Transport>(_: &T) {}
//! assert_transport(&transport);
//! ```

use std::future::Future;

use async_trait::async_trait;
use serde_json::Value;

use crate::clients::errors::TransportError;
use crate::clients::http_request::TransportRequest;

/// Performs one HTTP exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and returns the decoded response body.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] for network failures, responses the
    /// transport treats as failures, and undecodable bodies.
    async fn send(&self, request: TransportRequest) -> Result<Value, TransportError>;
}

#[async_trait]
impl<F, Fut> Transport for F
where
    F: Fn(TransportRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, TransportError>> + Send,
{
    async fn send(&self, request: TransportRequest) -> Result<Value, TransportError> {
        (self)(request).await
    }
}
