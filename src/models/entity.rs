//! Entity identity and the trait every managed record implements.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Stable unique identifier assigned by the backend.
///
/// The console API is inconsistent about id types: some resources return
/// JSON numbers, others strings. Both deserialize into the same opaque id
/// so the rest of the crate never cares.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(Self(s)),
            Value::Number(n) => Ok(Self(n.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "entity id must be a string or number, got {other}"
            ))),
        }
    }
}

/// A record managed through the console: one REST resource, one table screen.
///
/// `SEARCH_FIELDS` lists the serialized field names matched by client-side
/// search; an empty slice means search for that resource is delegated to the
/// server and the projector leaves the collection unfiltered.
pub trait CollectionItem:
    Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
    /// Path segment under the API base URL, e.g. `products`.
    const RESOURCE: &'static str;

    /// Singular noun used in notification messages.
    const LABEL: &'static str;

    /// Serialized field names searched client-side. Empty ⇒ server-side search.
    const SEARCH_FIELDS: &'static [&'static str];

    fn id(&self) -> &EntityId;

    /// Text rendering of one serialized field, used by client-side search and
    /// sort. Field names use the wire (camelCase) spelling.
    fn field_text(&self, field: &str) -> Option<String> {
        let value = serde_json::to_value(self).ok()?;
        match value.get(field)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_accepts_numbers_and_strings() {
        let from_number: EntityId = serde_json::from_str("42").unwrap();
        let from_string: EntityId = serde_json::from_str(r#""42""#).unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number.as_str(), "42");
    }

    #[test]
    fn test_entity_id_rejects_other_shapes() {
        assert!(serde_json::from_str::<EntityId>("[1]").is_err());
        assert!(serde_json::from_str::<EntityId>("null").is_err());
    }

    #[test]
    fn test_entity_id_display_round_trip() {
        let id = EntityId::from(7);
        assert_eq!(id.to_string(), "7");
        assert_eq!(EntityId::from("7"), id);
    }
}
