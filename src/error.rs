//! Configuration error types for the JSON:API provider.
//!
//! This module contains the error type returned while building a
//! [`ProviderConfig`](crate::ProviderConfig) or one of its validated newtypes.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use jsonapi_provider::{ApiPrefix, ConfigError};
//!
//! let result = ApiPrefix::new("/api/");
//! assert!(matches!(result, Err(ConfigError::InvalidPrefix { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur while configuring a resource provider.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The API prefix is malformed.
    #[error("Invalid API prefix '{prefix}': {reason}")]
    InvalidPrefix {
        /// The prefix that was provided.
        prefix: String,
        /// Why the prefix was rejected.
        reason: &'static str,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// A default header name is empty or contains invalid characters.
    #[error("Invalid header name '{name}'. Header names must be non-empty visible ASCII without ':' or whitespace.")]
    InvalidHeaderName {
        /// The header name that was provided.
        name: String,
    },

    /// A default header value contains characters HTTP does not allow.
    #[error("Invalid value for header '{name}'. Header values must be visible ASCII, spaces, or tabs, without CR or LF.")]
    InvalidHeaderValue {
        /// The name of the header whose value was rejected.
        name: String,
    },
}
