//! Flat JSON → JSON:API.
//!
//! Each flat object is split into `attributes` and `relationships`. A field
//! is a relationship when its value is an object carrying both `type` and
//! `id`, or an array whose first element is such an object. Only the
//! reference of a related object is kept; its other fields are dropped,
//! matching the normalized JSON:API model.

use serde_json::{Map, Value};

use crate::types::{
    EncoderOptions, JsonApiError, ResourceId, ATTRIBUTES, DATA, ID, META, RELATIONSHIPS, TYPE,
};
use crate::util::{contains_type_and_id, Object};

/// Converts a flat object, or an array of flat objects, into a JSON:API
/// document.
///
/// `additional` top-level fields (`meta`, `links`, ...) are copied next to
/// `data`; `data` itself always comes from `flat`.
///
/// # Example
///
/// ```
/// use json_api::{encode, EncoderOptions};
/// use serde_json::json;
///
/// let flat = json!({
///     "type": "articles", "id": "1", "title": "Hi",
///     "author": {"type": "people", "id": "9", "name": "Dan"}
/// });
/// let doc = encode(&flat, None, &EncoderOptions::default()).unwrap();
/// assert_eq!(doc, json!({
///     "data": {
///         "type": "articles", "id": "1",
///         "attributes": {"title": "Hi"},
///         "relationships": {"author": {"data": {"type": "people", "id": "9"}}}
///     }
/// }));
/// ```
///
/// # Errors
///
/// - `JsonApiError::MalformedInput` - `flat` is not an object or an array of
///   objects
/// - `JsonApiError::MissingIdentifier` - a relationship candidate has a
///   non-string `type` or `id`
pub fn encode(
    flat: &Value,
    additional: Option<&Map<String, Value>>,
    options: &EncoderOptions,
) -> Result<Value, JsonApiError> {
    let data = match flat {
        Value::Object(object) => encode_resource(object, options)?,
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Object(object) => encode_resource(object, options),
                _ => Err(JsonApiError::MalformedInput(
                    "cannot encode a non-object array element".into(),
                )),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)?,
        _ => {
            return Err(JsonApiError::MalformedInput(
                "cannot encode: expected an object or an array of objects".into(),
            ))
        }
    };

    tracing::debug!(
        resources = data.as_array().map_or(1, Vec::len),
        "encoded JSON:API document"
    );

    let mut document = additional.cloned().unwrap_or_default();
    document.insert(DATA.into(), data);
    Ok(Value::Object(document))
}

/// Parses `bytes` as JSON and encodes it with [`encode`].
pub fn encode_slice(
    bytes: &[u8],
    additional: Option<&Map<String, Value>>,
    options: &EncoderOptions,
) -> Result<Value, JsonApiError> {
    let flat: Value = serde_json::from_slice(bytes).map_err(|e| {
        JsonApiError::MalformedInput(format!("cannot convert input to JSON: {e}"))
    })?;
    encode(&flat, additional, options)
}

fn encode_resource(object: &Object, options: &EncoderOptions) -> Result<Value, JsonApiError> {
    let mut attributes = Object::new();
    let mut relationships = Object::new();
    let mut resource = Object::with_capacity(5);

    for (key, value) in object {
        match key.as_str() {
            TYPE | ID => {
                resource.insert(key.clone(), value.clone());
                continue;
            }
            META if options.include_meta_to_common_namespace => {
                resource.insert(key.clone(), value.clone());
                continue;
            }
            _ => {}
        }
        match value {
            Value::Array(items) if is_reference_array(items) => {
                let references = items
                    .iter()
                    .map(|item| reference(item, options))
                    .collect::<Result<Vec<_>, _>>()?;
                relationships.insert(key.clone(), linkage(Value::Array(references)));
            }
            Value::Object(related) if contains_type_and_id(related) => {
                relationships.insert(key.clone(), linkage(reference(value, options)?));
            }
            _ => {
                attributes.insert(key.clone(), value.clone());
            }
        }
    }

    resource.insert(ATTRIBUTES.into(), Value::Object(attributes));
    resource.insert(RELATIONSHIPS.into(), Value::Object(relationships));
    Ok(Value::Object(resource))
}

/// An array is a to-many relationship when its first element looks like a
/// resource; every element is then required to be one.
fn is_reference_array(items: &[Value]) -> bool {
    items
        .first()
        .and_then(Value::as_object)
        .is_some_and(contains_type_and_id)
}

/// `{type, id}` of a related object, plus its `meta` when meta lives in the
/// common namespace.
fn reference(related: &Value, options: &EncoderOptions) -> Result<Value, JsonApiError> {
    let id = ResourceId::from_value(related)?;
    let mut reference = id.to_stub();
    if options.include_meta_to_common_namespace {
        if let (Some(meta), Value::Object(out)) = (related.get(META), &mut reference) {
            out.insert(META.into(), meta.clone());
        }
    }
    Ok(reference)
}

fn linkage(data: Value) -> Value {
    let mut entry = Object::with_capacity(1);
    entry.insert(DATA.into(), data);
    Value::Object(entry)
}
