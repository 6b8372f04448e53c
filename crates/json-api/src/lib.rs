//! JSON:API codec.
//!
//! Converts [JSON:API](https://jsonapi.org) documents into flat JSON, with
//! relationships inlined as nested objects, and flat JSON back into JSON:API.
//!
//! # Example
//!
//! ```
//! use json_api::{decode, encode, DecoderOptions, EncoderOptions};
//! use serde_json::json;
//!
//! let doc = json!({
//!     "data": [{
//!         "type": "articles", "id": "1",
//!         "attributes": {"title": "Hi"},
//!         "relationships": {"comments": {"data": [{"type": "comments", "id": "5"}]}}
//!     }],
//!     "included": [{"type": "comments", "id": "5", "attributes": {"body": "First!"}}],
//!     "meta": {"total": 1}
//! });
//!
//! // Flatten, following only the `comments` relationship
//! let flat = decode(&doc, Some("comments"), &DecoderOptions::default()).unwrap();
//! assert_eq!(flat, json!({
//!     "data": [{
//!         "type": "articles", "id": "1", "title": "Hi",
//!         "comments": [{"type": "comments", "id": "5", "body": "First!"}]
//!     }],
//!     "meta": {"total": 1}
//! }));
//!
//! // And back
//! let article = &flat["data"][0];
//! let encoded = encode(article, None, &EncoderOptions::default()).unwrap();
//! assert_eq!(
//!     encoded["data"]["relationships"]["comments"],
//!     json!({"data": [{"type": "comments", "id": "5"}]})
//! );
//! ```

pub mod types;
pub use types::{DecoderOptions, EncoderOptions, JsonApiError, ResourceId};

mod util;

pub mod include;
pub use include::IncludeTree;

mod decode;
pub use decode::{decode, decode_slice, decode_to_vec};

mod encode;
pub use encode::{encode, encode_slice};

pub mod key_path;
pub use key_path::{parse_key_path, value_at_key_path};

mod typed;
pub use typed::{convert_keys_from_kebab_case, JsonApiDecoder, JsonApiEncoder, KeyDecodingStrategy};
