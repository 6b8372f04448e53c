//! Core types shared by the decoder and encoder.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

// ── Document keys ─────────────────────────────────────────────────────────

pub const DATA: &str = "data";
pub const ID: &str = "id";
pub const TYPE: &str = "type";
pub const INCLUDED: &str = "included";
pub const RELATIONSHIPS: &str = "relationships";
pub const ATTRIBUTES: &str = "attributes";
pub const META: &str = "meta";

// ── Errors ────────────────────────────────────────────────────────────────

/// Error returned by every decode and encode operation.
///
/// A failure always aborts the whole call; no partial document is produced.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum JsonApiError {
    /// Input bytes are not JSON, or the root/array shape is not what the
    /// operation requires.
    #[error("MALFORMED_INPUT: {0}")]
    MalformedInput(String),
    /// A resource object or reference lacks a string `type` or `id`.
    #[error("MISSING_IDENTIFIER: {0}")]
    MissingIdentifier(Value),
    /// A `relationships` entry is not an object, or its `data` has the wrong shape.
    #[error("MALFORMED_RELATIONSHIP: {name}: {value}")]
    MalformedRelationship { name: String, value: Value },
    /// A key path does not exist in the decoded tree.
    #[error("INVALID_KEY_PATH: {0}")]
    InvalidKeyPath(String),
    /// The flat tree could not be mapped to (or from) the requested type.
    #[error("MAPPING: {0}")]
    Mapping(String),
}

// ── Resource identifier ───────────────────────────────────────────────────

/// The `(type, id)` pair identifying a resource within one document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId {
    pub kind: String,
    pub id: String,
}

impl ResourceId {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Extracts the identifier from a resource object or reference.
    ///
    /// Both `type` and `id` must be strings.
    pub fn from_object(obj: &Map<String, Value>) -> Result<Self, JsonApiError> {
        match (obj.get(TYPE), obj.get(ID)) {
            (Some(Value::String(kind)), Some(Value::String(id))) => Ok(Self::new(kind, id)),
            _ => Err(JsonApiError::MissingIdentifier(Value::Object(obj.clone()))),
        }
    }

    /// Same as [`ResourceId::from_object`] for an arbitrary value.
    pub fn from_value(value: &Value) -> Result<Self, JsonApiError> {
        match value {
            Value::Object(obj) => Self::from_object(obj),
            other => Err(JsonApiError::MissingIdentifier(other.clone())),
        }
    }

    /// Bare `{type, id}` object standing in for an unresolved resource.
    pub fn to_stub(&self) -> Value {
        let mut stub = Map::with_capacity(2);
        stub.insert(TYPE.into(), Value::String(self.kind.clone()));
        stub.insert(ID.into(), Value::String(self.id.clone()));
        Value::Object(stub)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

// ── Options ───────────────────────────────────────────────────────────────

/// Options for decoding JSON:API into flat JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DecoderOptions {
    /// If true, a relationship whose target is not present in the document
    /// (or is outside the include list) is emitted as a `{type, id}` stub.
    /// If false it decodes to `null`, or is dropped from arrays.
    pub parse_not_included_relationships: bool,
}

impl DecoderOptions {
    pub fn new(parse_not_included_relationships: bool) -> Self {
        Self {
            parse_not_included_relationships,
        }
    }
}

/// Options for encoding flat JSON into JSON:API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EncoderOptions {
    /// Puts `meta` into the common namespace next to `type`, `id`,
    /// `attributes` and `relationships`. `meta` then can no longer be used as
    /// an attribute or relationship name.
    pub include_meta_to_common_namespace: bool,
}

impl EncoderOptions {
    pub fn new(include_meta_to_common_namespace: bool) -> Self {
        Self {
            include_meta_to_common_namespace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resource_id_from_object() {
        let obj = json!({"type": "people", "id": "9", "attributes": {}});
        let id = ResourceId::from_value(&obj).unwrap();
        assert_eq!(id, ResourceId::new("people", "9"));
        assert_eq!(id.to_string(), "people:9");
        assert_eq!(id.to_stub(), json!({"type": "people", "id": "9"}));
    }

    #[test]
    fn test_resource_id_requires_strings() {
        let numeric = json!({"type": "people", "id": 9});
        assert!(matches!(
            ResourceId::from_value(&numeric),
            Err(JsonApiError::MissingIdentifier(v)) if v == numeric
        ));
        let missing = json!({"id": "9"});
        assert!(ResourceId::from_value(&missing).is_err());
        assert!(ResourceId::from_value(&json!("people")).is_err());
    }

    #[test]
    fn test_options_from_config() {
        let opts: DecoderOptions =
            serde_json::from_value(json!({"parseNotIncludedRelationships": true})).unwrap();
        assert!(opts.parse_not_included_relationships);
        let opts: EncoderOptions = serde_json::from_value(json!({})).unwrap();
        assert_eq!(opts, EncoderOptions::default());
    }
}
