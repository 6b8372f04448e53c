//! Dotted key paths into a decoded tree, e.g. `data.author.name`.

use serde_json::Value;

use crate::types::JsonApiError;

/// Splits a dotted key path into its steps. An empty path is the root.
pub fn parse_key_path(key_path: &str) -> Vec<&str> {
    if key_path.is_empty() {
        return Vec::new();
    }
    key_path.split('.').collect()
}

/// Get the value at `key_path`.
///
/// Objects are walked by key and arrays by decimal index.
///
/// # Example
///
/// ```
/// use json_api::value_at_key_path;
/// use serde_json::json;
///
/// let doc = json!({"data": [{"author": {"name": "Dan"}}]});
/// let name = value_at_key_path(&doc, "data.0.author.name").unwrap();
/// assert_eq!(name, &json!("Dan"));
/// assert!(value_at_key_path(&doc, "data.1").is_err());
/// ```
///
/// # Errors
///
/// `JsonApiError::InvalidKeyPath` if any step does not exist.
pub fn value_at_key_path<'a>(val: &'a Value, key_path: &str) -> Result<&'a Value, JsonApiError> {
    let invalid = || JsonApiError::InvalidKeyPath(key_path.to_string());
    let mut current = val;
    for step in parse_key_path(key_path) {
        current = match current {
            Value::Object(map) => map.get(step).ok_or_else(invalid)?,
            Value::Array(arr) => {
                let idx: usize = step.parse().map_err(|_| invalid())?;
                arr.get(idx).ok_or_else(invalid)?
            }
            _ => return Err(invalid()),
        };
    }
    Ok(current)
}

/// Removes and returns the value at `key_path`, leaving `Null` in its place.
pub fn take_at_key_path(val: &mut Value, key_path: &str) -> Result<Value, JsonApiError> {
    let invalid = || JsonApiError::InvalidKeyPath(key_path.to_string());
    let mut current = val;
    for step in parse_key_path(key_path) {
        current = match current {
            Value::Object(map) => map.get_mut(step).ok_or_else(invalid)?,
            Value::Array(arr) => {
                let idx: usize = step.parse().map_err(|_| invalid())?;
                arr.get_mut(idx).ok_or_else(invalid)?
            }
            _ => return Err(invalid()),
        };
    }
    Ok(current.take())
}
