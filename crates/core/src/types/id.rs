//! Product identifiers.
//!
//! Products are identified by the opaque string the catalog page assigns
//! them (e.g. `"baobab-oil-100ml"`). Wrapping it keeps product IDs from being
//! mixed up with display names, which are also plain strings.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Stable product identifier; the uniqueness key for cart lines.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new product ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the ID and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_equality() {
        assert_eq!(ProductId::new("mango-1"), ProductId::from("mango-1"));
        assert_ne!(ProductId::new("mango-1"), ProductId::new("mango-2"));
    }

    #[test]
    fn test_product_id_display() {
        let id = ProductId::new("chitenge-wrap");
        assert_eq!(format!("{id}"), "chitenge-wrap");
    }

    #[test]
    fn test_product_id_serializes_as_plain_string() {
        let id = ProductId::new("p-42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"p-42\"");

        let parsed: ProductId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
