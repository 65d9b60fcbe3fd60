//! # JSON:API Provider
//!
//! A client-side access layer for JSON:API servers: resources identified by
//! `(type, id)`, addressable relationships, sparse fieldsets, filtering,
//! sorting, pagination, compound documents, and atomic bulk requests.
//!
//! ## Overview
//!
//! This crate provides:
//! - A uniform operation set via the [`ResourceProvider`] trait
//! - [`NetworkResourceProvider`], which maps operations to HTTP requests over
//!   an injected [`Transport`](clients::Transport)
//! - Deterministic query composition via [`query::compose`], with pluggable
//!   [`PaginationComposer`](query::PaginationComposer) strategies
//! - A tagged [`Document`] type separating success data from protocol errors
//! - [`ResourceContainer`] for resolving relationships against `included`
//! - Optional request and response validation against a
//!   [`SchemaRegistry`](schema::SchemaRegistry)
//! - Dirty tracking for partial updates via [`TrackedResource`]
//!
//! ## Quick Start
//!
//! ```rust
//! use jsonapi_provider::{ApiPrefix, ProviderConfig};
//!
//! let config = ProviderConfig::builder()
//!     .prefix(ApiPrefix::new("/api").unwrap())
//!     .header("Authorization", "Bearer token")
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Fetching Resources
//!
//! ```rust,ignore
//! use jsonapi_provider::clients::ReqwestTransport;
//! use jsonapi_provider::query::{NoPagination, QueryParams, SortTerm};
//! use jsonapi_provider::{Document, NetworkResourceProvider, ResourceProvider};
//!
//! let transport = ReqwestTransport::new("https://example.com")?;
//! let provider = NetworkResourceProvider::new(config, transport, NoPagination);
//!
//! // GET /api/notes?fields[notes]=title,text&sort=-title&include=author,tags.name
//! let params = QueryParams::new()
//!     .fields("notes", ["title", "text"])
//!     .sort(SortTerm::desc("title"))
//!     .include("author")
//!     .include("tags.name");
//!
//! match provider.get_many("notes", params).await? {
//!     Document::Data(doc) => {
//!         let container = doc.container();
//!         let author = container.get_relationship("notes", "1", "author")?;
//!     }
//!     Document::Errors(doc) => {
//!         for error in doc.errors {
//!             println!("{:?}: {:?}", error.status, error.title);
//!         }
//!     }
//! }
//! ```
//!
//! ## Updating Resources
//!
//! ```rust,ignore
//! use jsonapi_provider::TrackedResource;
//! use serde_json::json;
//!
//! let mut note = TrackedResource::from_existing(stored_note);
//! note.attributes.insert("title".to_string(), json!("Renamed"));
//!
//! // PATCH /api/notes/1? with only the changed members
//! let id = note.id.clone().unwrap();
//! provider.update_one("notes", &id, note.changes(), QueryParams::new()).await?;
//! ```
//!
//! ## Error Channels
//!
//! - Protocol errors (`{"errors": [...]}`) are [`Document::Errors`] values
//! - Transport failures are [`ProviderError::Transport`], propagated unchanged
//! - Relationship lookups that cannot succeed are [`ContainerError`]s
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: Newtypes and schemas validate on construction
//! - **Thread-safe**: Providers and configuration are `Send + Sync`
//! - **Transport-agnostic**: Cancellation, timeouts, and retries belong to the transport

pub mod clients;
pub mod config;
pub mod container;
pub mod document;
pub mod error;
pub mod provider;
pub mod query;
pub mod schema;

// Re-export public types at crate root for convenience
pub use config::{ApiPrefix, ProviderConfig, ProviderConfigBuilder};
pub use error::ConfigError;

// Re-export document types
pub use container::{ContainerError, Resolved, ResourceContainer};
pub use document::{
    DataDocument, Document, DocumentError, ErrorDocument, ErrorObject, Relationship,
    RelationshipData, Resource, ResourceIdentifier, TrackedResource,
};

// Re-export provider types
pub use provider::{
    BulkEntry, BulkResponse, NetworkResourceProvider, Operation, OperationKind, ProviderError,
    ResourceProvider,
};
