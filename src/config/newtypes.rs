//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated URL prefix prepended to every resource path.
///
/// The prefix is the part of the URL that precedes `/<type>`, for example
/// `/api` or `https://example.com/api/v1`. It may be empty, in which case
/// resource paths start at the host root.
///
/// # Validation
///
/// - Must not end with `/` (paths are joined with a single `/`)
/// - Must not contain `?` or `#` (the query string is built per request)
/// - Must not contain whitespace
///
/// # Example
///
/// ```rust
/// use jsonapi_provider::ApiPrefix;
///
/// let prefix = ApiPrefix::new("/api").unwrap();
/// assert_eq!(prefix.as_ref(), "/api");
/// assert_eq!(prefix.join(&["notes", "12"]), "/api/notes/12");
///
/// assert!(ApiPrefix::new("/api/").is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ApiPrefix(String);

impl ApiPrefix {
    /// Creates a new validated API prefix.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPrefix`] if the prefix ends with `/`,
    /// contains a query or fragment delimiter, or contains whitespace.
    pub fn new(prefix: impl Into<String>) -> Result<Self, ConfigError> {
        let prefix = prefix.into();

        let reason = if prefix.ends_with('/') {
            Some("must not end with '/'")
        } else if prefix.contains(['?', '#']) {
            Some("must not contain a query string or fragment")
        } else if prefix.chars().any(char::is_whitespace) {
            Some("must not contain whitespace")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(ConfigError::InvalidPrefix { prefix, reason }),
            None => Ok(Self(prefix)),
        }
    }

    /// Joins already-encoded path segments onto the prefix.
    #[must_use]
    pub fn join(&self, segments: &[&str]) -> String {
        let mut path = self.0.clone();
        for segment in segments {
            path.push('/');
            path.push_str(segment);
        }
        path
    }
}

impl AsRef<str> for ApiPrefix {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ApiPrefix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ApiPrefix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}
