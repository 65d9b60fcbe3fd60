//! Configuration types for the JSON:API provider.
//!
//! This module provides the configuration used to construct a
//! [`NetworkResourceProvider`](crate::provider::NetworkResourceProvider).
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`ProviderConfig`]: The fixed configuration of one provider instance
//! - [`ProviderConfigBuilder`]: A builder for constructing [`ProviderConfig`] instances
//! - [`ApiPrefix`]: A validated URL prefix
//!
//! # Example
//!
//! ```rust
//! use jsonapi_provider::{ApiPrefix, ProviderConfig};
//!
//! let config = ProviderConfig::builder()
//!     .prefix(ApiPrefix::new("/api").unwrap())
//!     .header("Authorization", "Bearer token")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.prefix().as_ref(), "/api");
//! ```

mod newtypes;

pub use newtypes::ApiPrefix;

use std::sync::Arc;

use indexmap::IndexMap;

use crate::clients::set_header;
use crate::error::ConfigError;
use crate::schema::SchemaRegistry;

/// Media type defined by the JSON:API specification.
pub const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configuration for a resource provider.
///
/// Holds everything a provider needs besides its transport and pagination
/// composer: the URL prefix, the headers sent with every request, and an
/// optional schema registry used to validate requests and responses.
///
/// # Thread Safety
///
/// `ProviderConfig` is `Clone`, `Send`, and `Sync`. The schema registry is
/// shared behind an [`Arc`], so cloning a configuration is cheap.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    prefix: ApiPrefix,
    headers: IndexMap<String, String>,
    schema: Option<Arc<SchemaRegistry>>,
}

impl ProviderConfig {
    /// Creates a new builder for constructing a `ProviderConfig`.
    #[must_use]
    pub fn builder() -> ProviderConfigBuilder {
        ProviderConfigBuilder::new()
    }

    /// Returns the URL prefix.
    #[must_use]
    pub const fn prefix(&self) -> &ApiPrefix {
        &self.prefix
    }

    /// Returns the headers sent with every request, in insertion order.
    #[must_use]
    pub const fn headers(&self) -> &IndexMap<String, String> {
        &self.headers
    }

    /// Returns the schema registry, if configured.
    #[must_use]
    pub fn schema(&self) -> Option<&SchemaRegistry> {
        self.schema.as_deref()
    }
}

// Verify ProviderConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ProviderConfig>();
};

/// Builder for constructing [`ProviderConfig`] instances.
///
/// `prefix` is required. All other fields have defaults.
///
/// # Defaults
///
/// - `Accept: application/vnd.api+json` and a `User-Agent` header
/// - no extra headers
/// - no schema registry (no validation)
#[derive(Debug, Default)]
pub struct ProviderConfigBuilder {
    prefix: Option<ApiPrefix>,
    headers: Vec<(String, String)>,
    user_agent_prefix: Option<String>,
    schema: Option<Arc<SchemaRegistry>>,
}

impl ProviderConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the URL prefix (required).
    #[must_use]
    pub fn prefix(mut self, prefix: ApiPrefix) -> Self {
        self.prefix = Some(prefix);
        self
    }

    /// Adds a header sent with every request.
    ///
    /// Later calls with the same name replace the earlier value, including
    /// the default `Accept` header. Names are compared case-insensitively.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the schema registry used to validate requests and responses.
    #[must_use]
    pub fn schema(mut self, schema: impl Into<Arc<SchemaRegistry>>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Builds the [`ProviderConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `prefix` is not set,
    /// [`ConfigError::InvalidHeaderName`] if a header name is invalid, or
    /// [`ConfigError::InvalidHeaderValue`] if a header value is invalid.
    pub fn build(self) -> Result<ProviderConfig, ConfigError> {
        let prefix = self
            .prefix
            .ok_or(ConfigError::MissingRequiredField { field: "prefix" })?;

        let user_agent_prefix = self
            .user_agent_prefix
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}JSON:API Provider v{SDK_VERSION} | Rust");

        let mut headers = IndexMap::new();
        headers.insert("Accept".to_string(), JSON_API_MEDIA_TYPE.to_string());
        headers.insert("User-Agent".to_string(), user_agent);

        for (name, value) in self.headers {
            if !is_valid_header_name(&name) {
                return Err(ConfigError::InvalidHeaderName { name });
            }
            if !is_valid_header_value(&value) {
                return Err(ConfigError::InvalidHeaderValue { name });
            }
            set_header(&mut headers, name, value);
        }

        Ok(ProviderConfig {
            prefix,
            headers,
            schema: self.schema,
        })
    }
}

fn is_valid_header_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_graphic() && b != b':')
}

fn is_valid_header_value(value: &str) -> bool {
    value
        .bytes()
        .all(|b| b.is_ascii_graphic() || b == b' ' || b == b'\t')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefix() -> ApiPrefix {
        ApiPrefix::new("/api").unwrap()
    }

    #[test]
    fn test_builder_requires_prefix() {
        let result = ProviderConfigBuilder::new().build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "prefix" })
        ));
    }

    #[test]
    fn test_default_accept_header_is_json_api() {
        let config = ProviderConfig::builder().prefix(prefix()).build().unwrap();

        assert_eq!(
            config.headers().get("Accept"),
            Some(&JSON_API_MEDIA_TYPE.to_string())
        );
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = ProviderConfig::builder()
            .prefix(prefix())
            .user_agent_prefix("MyApp/1.0")
            .build()
            .unwrap();

        let user_agent = config.headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("MyApp/1.0 | "));
        assert!(user_agent.contains("JSON:API Provider v"));
    }

    #[test]
    fn test_custom_header_overrides_default() {
        let config = ProviderConfig::builder()
            .prefix(prefix())
            .header("Accept", "application/json")
            .header("Authorization", "Bearer abc")
            .build()
            .unwrap();

        assert_eq!(
            config.headers().get("Accept"),
            Some(&"application/json".to_string())
        );
        assert_eq!(
            config.headers().get("Authorization"),
            Some(&"Bearer abc".to_string())
        );
    }

    #[test]
    fn test_invalid_header_name_is_rejected() {
        let result = ProviderConfig::builder()
            .prefix(prefix())
            .header("Bad Header", "value")
            .build();

        assert!(matches!(
            result,
            Err(ConfigError::InvalidHeaderName { name }) if name == "Bad Header"
        ));
    }

    #[test]
    fn test_header_override_ignores_case() {
        let config = ProviderConfig::builder()
            .prefix(prefix())
            .header("accept", "application/json")
            .header("X-Trace", "1")
            .header("x-trace", "2")
            .build()
            .unwrap();

        let accepts: Vec<&String> = config
            .headers()
            .keys()
            .filter(|name| name.eq_ignore_ascii_case("accept"))
            .collect();
        assert_eq!(accepts, vec!["Accept"]);
        assert_eq!(
            config.headers().get("Accept").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(config.headers().get("X-Trace").map(String::as_str), Some("2"));
        assert!(config.headers().get("x-trace").is_none());
    }

    #[test]
    fn test_header_value_with_line_break_is_rejected() {
        let result = ProviderConfig::builder()
            .prefix(prefix())
            .header("Authorization", "Bearer abc\r\nX-Injected: 1")
            .build();

        assert_eq!(
            result.unwrap_err(),
            ConfigError::InvalidHeaderValue {
                name: "Authorization".to_string()
            }
        );
    }

    #[test]
    fn test_header_value_allows_spaces_and_tabs() {
        let config = ProviderConfig::builder()
            .prefix(prefix())
            .header("X-Note", "a b\tc")
            .build()
            .unwrap();

        assert_eq!(config.headers().get("X-Note").map(String::as_str), Some("a b\tc"));
    }

    #[test]
    fn test_schema_defaults_to_none() {
        let config = ProviderConfig::builder().prefix(prefix()).build().unwrap();
        assert!(config.schema().is_none());
    }

    #[test]
    fn test_config_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ProviderConfig>();
    }
}
