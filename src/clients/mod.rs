//! Transport layer for JSON:API communication.
//!
//! This module provides the boundary between the provider and the network.
//! The provider builds a [`TransportRequest`] (method, URL, headers, optional
//! JSON body) and hands it to an injected [`Transport`], which performs one
//! HTTP exchange and returns the decoded body or fails.
//!
//! # Overview
//!
//! - [`Transport`]: the injected exchange function (any matching async closure works)
//! - [`ReqwestTransport`]: the default transport over `reqwest`
//! - [`TransportRequest`]: a request handed to a transport
//! - [`HttpMethod`]: GET, POST, PATCH, DELETE
//! - [`TransportError`]: transport-level failures, propagated unchanged
//!
//! # Example
//!
//! ```rust,ignore
//! use jsonapi_provider::clients::ReqwestTransport;
//! use jsonapi_provider::{ApiPrefix, NetworkResourceProvider, NoPagination, ProviderConfig};
//!
//! let config = ProviderConfig::builder()
//!     .prefix(ApiPrefix::new("/api")?)
//!     .build()?;
//! let transport = ReqwestTransport::new("https://example.com")?;
//! let provider = NetworkResourceProvider::new(config, transport, NoPagination);
//! ```

mod errors;
mod http_client;
mod http_request;
mod transport;

pub use errors::{HttpResponseError, InvalidRequestError, TransportError};
pub use http_client::ReqwestTransport;
pub use http_request::{HttpMethod, TransportRequest, TransportRequestBuilder};
pub(crate) use http_request::set_header;
pub use transport::Transport;
