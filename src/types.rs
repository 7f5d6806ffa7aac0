//! Common types used throughout saas-bridge
//!
//! Shared type aliases, the resource item record produced by listing
//! endpoints, and small enums used by more than one module.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Resource Item
// ============================================================================

/// A single record returned by a listing endpoint.
///
/// Only `id` and `name` are interpreted; everything else the API sent is kept
/// untouched in `attributes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceItem {
    /// Resource type label as reported by the API (e.g. "tag", "segment")
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Stable identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Full attribute object, including `name`
    #[serde(default)]
    pub attributes: JsonObject,
}

impl ResourceItem {
    /// Create an item with no extra attributes
    pub fn new(
        resource_type: impl Into<String>,
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let mut attributes = JsonObject::new();
        attributes.insert("name".to_string(), JsonValue::String(name.clone()));
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
            name,
            attributes,
        }
    }

    /// Look up an attribute other than `name`
    pub fn attribute(&self, key: &str) -> Option<&JsonValue> {
        self.attributes.get(key)
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_item_new() {
        let item = ResourceItem::new("tag", "t-1", "VIP");
        assert_eq!(item.id, "t-1");
        assert_eq!(item.name, "VIP");
        assert_eq!(item.attribute("name"), Some(&JsonValue::from("VIP")));
        assert!(item.attribute("created").is_none());
    }

    #[test]
    fn test_resource_item_serde() {
        let item = ResourceItem::new("segment", "s-9", "Engaged 30d");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "segment");
        assert_eq!(json["attributes"]["name"], "Engaged 30d");
    }

    #[test]
    fn test_backoff_type_serde() {
        let backoff: BackoffType = serde_json::from_str("\"linear\"").unwrap();
        assert_eq!(backoff, BackoffType::Linear);
        assert_eq!(BackoffType::default(), BackoffType::Exponential);
    }
}
