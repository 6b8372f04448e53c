//! Typed decoding and encoding through serde.
//!
//! [`JsonApiDecoder`] flattens a document and deserializes the flat tree into
//! any `DeserializeOwned` type. [`JsonApiEncoder`] serializes a value and
//! encodes the result as a JSON:API document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::decode::decode;
use crate::encode::encode;
use crate::key_path::take_at_key_path;
use crate::types::{DecoderOptions, EncoderOptions, JsonApiError};

/// How object keys of the flat tree are rewritten before deserialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyDecodingStrategy {
    /// Keys are passed through unchanged.
    #[default]
    UseDefaultKeys,
    /// `image-url` becomes `image_url`.
    ConvertFromKebabCase,
}

impl KeyDecodingStrategy {
    fn apply(self, value: &mut Value) {
        if self == KeyDecodingStrategy::ConvertFromKebabCase {
            convert_keys_from_kebab_case(value);
        }
    }
}

/// Recursively rewrites every object key from kebab-case to snake_case.
pub fn convert_keys_from_kebab_case(value: &mut Value) {
    match value {
        Value::Object(map) => {
            let entries = std::mem::take(map);
            for (key, mut child) in entries {
                convert_keys_from_kebab_case(&mut child);
                let key = if key.contains('-') {
                    key.replace('-', "_")
                } else {
                    key
                };
                map.insert(key, child);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(convert_keys_from_kebab_case),
        _ => {}
    }
}

/// Decodes JSON:API documents into typed values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonApiDecoder {
    pub options: DecoderOptions,
    pub key_strategy: KeyDecodingStrategy,
}

impl JsonApiDecoder {
    pub fn new(options: DecoderOptions) -> Self {
        Self {
            options,
            key_strategy: KeyDecodingStrategy::default(),
        }
    }

    /// Decoder converting kebab-case keys to snake_case field names.
    pub fn kebab_case() -> Self {
        Self {
            options: DecoderOptions::default(),
            key_strategy: KeyDecodingStrategy::ConvertFromKebabCase,
        }
    }

    pub fn with_key_strategy(mut self, key_strategy: KeyDecodingStrategy) -> Self {
        self.key_strategy = key_strategy;
        self
    }

    /// Decodes the whole flattened document into `T`.
    pub fn decode_value<T: DeserializeOwned>(
        &self,
        document: &Value,
        include_list: Option<&str>,
    ) -> Result<T, JsonApiError> {
        let flat = decode(document, include_list, &self.options)?;
        self.map(flat)
    }

    /// Parses `bytes` and decodes the whole flattened document into `T`.
    pub fn decode_slice<T: DeserializeOwned>(
        &self,
        bytes: &[u8],
        include_list: Option<&str>,
    ) -> Result<T, JsonApiError> {
        self.decode_at_key_path(bytes, include_list, None)
    }

    /// Parses and flattens `bytes`, then decodes the sub-tree at `key_path`
    /// into `T`. `None` or an empty path decodes the whole document.
    ///
    /// # Example
    ///
    /// ```
    /// use json_api::JsonApiDecoder;
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Article {
    ///     id: String,
    ///     title: String,
    /// }
    ///
    /// let body = br#"{"data": {"type": "articles", "id": "1", "attributes": {"title": "Hi"}}}"#;
    /// let article: Article = JsonApiDecoder::default()
    ///     .decode_at_key_path(body, None, Some("data"))
    ///     .unwrap();
    /// assert_eq!(article.id, "1");
    /// assert_eq!(article.title, "Hi");
    /// ```
    pub fn decode_at_key_path<T: DeserializeOwned>(
        &self,
        bytes: &[u8],
        include_list: Option<&str>,
        key_path: Option<&str>,
    ) -> Result<T, JsonApiError> {
        let mut flat = crate::decode::decode_slice(bytes, include_list, &self.options)?;
        let target = match key_path {
            Some(path) if !path.is_empty() => take_at_key_path(&mut flat, path)?,
            _ => flat,
        };
        self.map(target)
    }

    fn map<T: DeserializeOwned>(&self, mut flat: Value) -> Result<T, JsonApiError> {
        self.key_strategy.apply(&mut flat);
        serde_json::from_value(flat).map_err(|e| JsonApiError::Mapping(e.to_string()))
    }
}

/// Encodes typed values into JSON:API documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonApiEncoder {
    pub options: EncoderOptions,
}

impl JsonApiEncoder {
    pub fn new(options: EncoderOptions) -> Self {
        Self { options }
    }

    /// Serializes `value` (a struct or a sequence of structs) and encodes it.
    pub fn encode<T: Serialize + ?Sized>(
        &self,
        value: &T,
        additional: Option<&Map<String, Value>>,
    ) -> Result<Value, JsonApiError> {
        let flat = serde_json::to_value(value).map_err(|e| JsonApiError::Mapping(e.to_string()))?;
        encode(&flat, additional, &self.options)
    }

    /// Same as [`JsonApiEncoder::encode`], serialized to bytes.
    pub fn encode_to_vec<T: Serialize + ?Sized>(
        &self,
        value: &T,
        additional: Option<&Map<String, Value>>,
    ) -> Result<Vec<u8>, JsonApiError> {
        let document = self.encode(value, additional)?;
        serde_json::to_vec(&document).map_err(|e| JsonApiError::Mapping(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_convert_keys_from_kebab_case() {
        let mut value = json!({
            "image-url": "a.png",
            "owner": {"first-name": "Ash", "tags": [{"is-new": true}]},
            "plain": "x-y"
        });
        convert_keys_from_kebab_case(&mut value);
        assert_eq!(
            value,
            json!({
                "image_url": "a.png",
                "owner": {"first_name": "Ash", "tags": [{"is_new": true}]},
                "plain": "x-y"
            })
        );
    }

    #[test]
    fn test_default_strategy_keeps_keys() {
        let mut value = json!({"image-url": "a.png"});
        KeyDecodingStrategy::UseDefaultKeys.apply(&mut value);
        assert_eq!(value, json!({"image-url": "a.png"}));
    }
}
