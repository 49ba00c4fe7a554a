//! Product identifiers.
//!
//! Catalog feeds are hand-edited JSON, so ids arrive either as strings
//! (`"aria-gown"`) or as numbers (`12`). Both are stored as strings.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A product id, unique within a catalog.
///
/// # Example
///
/// ```rust
/// # use muva_core::ProductId;
/// let id = ProductId::new("aria-gown");
/// assert_eq!(id.as_str(), "aria-gown");
/// assert_eq!(ProductId::from_json(&serde_json::json!(12)), Some(ProductId::new("12")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new id from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Read an id from a feed value.
    ///
    /// Accepts non-empty strings and integers; anything else is `None`.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(Self(s.trim().to_owned())),
            serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => Some(Self(n.to_string())),
            _ => None,
        }
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
