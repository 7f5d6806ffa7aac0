//! Secret value types and parsing

use crate::types::{JsonObject, JsonValue};
use serde::Serialize;

/// Key under which nested secrets are stored
const NESTED_KEY: &str = "secret_value";

/// Key used when a secret is a plain string
const RAW_KEY: &str = "value";

/// A resolved secret, always presented as a flat key/value object
#[derive(Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SecretValue(JsonObject);

impl SecretValue {
    /// Wrap an existing object
    pub fn from_map(map: JsonObject) -> Self {
        Self(map)
    }

    /// Wrap a raw string as `{"value": raw}`
    pub fn raw(value: impl Into<String>) -> Self {
        let mut map = JsonObject::new();
        map.insert(RAW_KEY.to_string(), JsonValue::String(value.into()));
        Self(map)
    }

    /// Get a field
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    /// Get a non-empty string field
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(JsonValue::as_str)
            .filter(|s| !s.is_empty())
    }

    /// The API key: `api_key` when present, otherwise the raw `value`
    pub fn api_key(&self) -> Option<&str> {
        self.get_str("api_key").or_else(|| self.get_str(RAW_KEY))
    }

    /// Field names, for diagnostics that must not print values
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Borrow the underlying object
    pub fn as_map(&self) -> &JsonObject {
        &self.0
    }

    /// Take the underlying object
    pub fn into_inner(self) -> JsonObject {
        self.0
    }
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretValue")
            .field("keys", &self.0.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Parse a secret string into a [`SecretValue`]
///
/// - JSON objects are returned as they are
/// - an object holding `secret_value` is unwrapped; the inner value is
///   parsed as an object when possible, otherwise kept as `{"value": inner}`
/// - anything else is kept as `{"value": raw}`
pub fn parse_secret_string(raw: &str) -> SecretValue {
    let Ok(JsonValue::Object(mut map)) = serde_json::from_str::<JsonValue>(raw) else {
        return SecretValue::raw(raw);
    };

    match map.remove(NESTED_KEY) {
        None => SecretValue(map),
        Some(JsonValue::Object(inner)) => SecretValue(inner),
        Some(JsonValue::String(inner)) => match serde_json::from_str::<JsonValue>(&inner) {
            Ok(JsonValue::Object(inner_map)) => SecretValue(inner_map),
            _ => SecretValue::raw(inner),
        },
        Some(other) => SecretValue::raw(other.to_string()),
    }
}
