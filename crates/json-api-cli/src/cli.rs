//! Core logic behind the `json-api` binary.
//!
//! Each command takes the document text and returns the output text, so the
//! binary itself only deals with argument parsing and stdio.

use json_api::{
    decode_slice, encode_slice, value_at_key_path, DecoderOptions, EncoderOptions, JsonApiError,
};
use serde_json::{Map, Value};
use thiserror::Error;

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    JsonApi(#[from] JsonApiError),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("additional fields must be a JSON object")]
    AdditionalNotObject,
}

// ── decode ────────────────────────────────────────────────────────────────

/// Flatten a JSON:API document.
///
/// With `key_path`, only the sub-tree at that path is printed.
pub fn decode_document(
    input: &str,
    include_list: Option<&str>,
    key_path: Option<&str>,
    options: &DecoderOptions,
    pretty: bool,
) -> Result<String, CliError> {
    let flat = decode_slice(input.as_bytes(), include_list, options)?;
    let out = match key_path {
        Some(path) => value_at_key_path(&flat, path)?,
        None => &flat,
    };
    render(out, pretty)
}

// ── encode ────────────────────────────────────────────────────────────────

/// Encode a flat object (or array of objects) as a JSON:API document.
///
/// `additional` is a JSON object whose fields are added next to `data`.
pub fn encode_document(
    input: &str,
    additional: Option<&str>,
    options: &EncoderOptions,
    pretty: bool,
) -> Result<String, CliError> {
    let additional = additional.map(parse_additional).transpose()?;
    let doc = encode_slice(input.as_bytes(), additional.as_ref(), options)?;
    render(&doc, pretty)
}

fn parse_additional(text: &str) -> Result<Map<String, Value>, CliError> {
    match serde_json::from_str(text)? {
        Value::Object(map) => Ok(map),
        _ => Err(CliError::AdditionalNotObject),
    }
}

fn render(value: &Value, pretty: bool) -> Result<String, CliError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DOC: &str = r#"{
        "data": {
            "type": "articles", "id": "1",
            "attributes": {"title": "Hi"},
            "relationships": {"author": {"data": {"type": "people", "id": "9"}}}
        },
        "included": [{"type": "people", "id": "9", "attributes": {"name": "Dan"}}]
    }"#;

    fn parse(text: &str) -> Value {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn test_decode_document() {
        let out = decode_document(DOC, None, None, &DecoderOptions::default(), false).unwrap();
        assert_eq!(
            parse(&out),
            json!({"data": {
                "type": "articles", "id": "1", "title": "Hi",
                "author": {"type": "people", "id": "9", "name": "Dan"}
            }})
        );
    }

    #[test]
    fn test_decode_document_key_path_and_include() {
        let out = decode_document(
            DOC,
            Some(""),
            Some("data.author"),
            &DecoderOptions::new(true),
            true,
        )
        .unwrap();
        assert_eq!(parse(&out), json!({"type": "people", "id": "9"}));

        let err = decode_document(DOC, None, Some("data.x"), &DecoderOptions::default(), true)
            .unwrap_err();
        assert!(matches!(err, CliError::JsonApi(JsonApiError::InvalidKeyPath(_))));
    }

    #[test]
    fn test_decode_document_rejects_bad_json() {
        let err = decode_document("{", None, None, &DecoderOptions::default(), true).unwrap_err();
        assert!(matches!(err, CliError::JsonApi(JsonApiError::MalformedInput(_))));
    }

    #[test]
    fn test_encode_document() {
        let input = r#"{"type": "articles", "id": "1", "title": "Hi", "meta": {"v": 1}}"#;
        let out = encode_document(
            input,
            Some(r#"{"links": {"self": "/articles/1"}}"#),
            &EncoderOptions::new(true),
            false,
        )
        .unwrap();
        assert_eq!(
            parse(&out),
            json!({
                "links": {"self": "/articles/1"},
                "data": {
                    "type": "articles", "id": "1", "meta": {"v": 1},
                    "attributes": {"title": "Hi"}, "relationships": {}
                }
            })
        );
    }

    #[test]
    fn test_encode_document_additional_must_be_object() {
        let err = encode_document(r#"{"type": "a"}"#, Some("[1]"), &EncoderOptions::default(), true)
            .unwrap_err();
        assert!(matches!(err, CliError::AdditionalNotObject));

        let err = encode_document(r#"{"type": "a"}"#, Some("{"), &EncoderOptions::default(), true)
            .unwrap_err();
        assert!(matches!(err, CliError::Json(_)));
    }
}
