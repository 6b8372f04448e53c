//! Coercion helpers over `serde_json::Value`.
//!
//! Every helper fails with a structured [`JsonApiError`] instead of
//! panicking on an unexpected shape.

use serde_json::{Map, Value};

use crate::types::{JsonApiError, DATA, ID, TYPE};

pub(crate) type Object = Map<String, Value>;

/// Reads `key` as a list of objects.
///
/// A single object is treated as a one-element list. `null` and a missing key
/// both yield `None`.
pub(crate) fn object_list<'a>(
    parent: &'a Object,
    key: &str,
) -> Result<Option<Vec<&'a Object>>, JsonApiError> {
    match parent.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(obj)) => Ok(Some(vec![obj])),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_object().ok_or_else(|| {
                    JsonApiError::MalformedInput(format!("`{key}` must contain only objects"))
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(_) => Err(JsonApiError::MalformedInput(format!(
            "`{key}` must be an object or an array of objects"
        ))),
    }
}

/// Reads `key` as an optional object. `null` counts as missing.
pub(crate) fn optional_object<'a>(
    parent: &'a Object,
    key: &str,
) -> Result<Option<&'a Object>, JsonApiError> {
    match parent.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(obj)) => Ok(Some(obj)),
        Some(_) => Err(JsonApiError::MalformedInput(format!(
            "`{key}` must be an object"
        ))),
    }
}

/// Whether `obj` carries both a `type` and an `id` key, regardless of value.
pub(crate) fn contains_type_and_id(obj: &Object) -> bool {
    obj.contains_key(TYPE) && obj.contains_key(ID)
}

/// Resource linkage found under a relationship's `data` key.
#[derive(Debug)]
pub(crate) enum Linkage<'a> {
    /// `data` is `null` or missing.
    Empty,
    One(&'a Object),
    Many(Vec<&'a Object>),
}

impl<'a> Linkage<'a> {
    /// Validates a single `relationships.<name>` entry.
    pub(crate) fn parse(name: &str, relationship: &'a Value) -> Result<Self, JsonApiError> {
        let malformed = || JsonApiError::MalformedRelationship {
            name: name.to_string(),
            value: relationship.clone(),
        };
        let entry = relationship.as_object().ok_or_else(malformed)?;
        match entry.get(DATA) {
            None | Some(Value::Null) => Ok(Linkage::Empty),
            Some(Value::Object(obj)) => Ok(Linkage::One(obj)),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| item.as_object().ok_or_else(malformed))
                .collect::<Result<Vec<_>, _>>()
                .map(Linkage::Many),
            Some(_) => Err(malformed()),
        }
    }

    /// The raw linkage value, as it appeared in the source document.
    pub(crate) fn raw(&self) -> Value {
        match self {
            Linkage::Empty => Value::Null,
            Linkage::One(obj) => Value::Object((*obj).clone()),
            Linkage::Many(items) => {
                Value::Array(items.iter().map(|obj| Value::Object((*obj).clone())).collect())
            }
        }
    }
}
