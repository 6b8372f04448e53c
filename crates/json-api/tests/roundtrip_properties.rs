use json_api::{decode, encode, DecoderOptions, EncoderOptions, IncludeTree};
use serde_json::{json, Value};

fn blog_doc() -> Value {
    json!({
        "data": [
            {
                "type": "articles", "id": "1",
                "attributes": {"title": "JSON:API paints my bikeshed!", "tags": ["api", "json"]},
                "relationships": {
                    "author": {"data": {"type": "people", "id": "9"}},
                    "comments": {"data": [
                        {"type": "comments", "id": "5"},
                        {"type": "comments", "id": "12"}
                    ]}
                }
            },
            {
                "type": "articles", "id": "2",
                "attributes": {"title": "Second", "tags": []},
                "relationships": {
                    "author": {"data": null},
                    "comments": {"data": []}
                }
            }
        ],
        "included": [
            {"type": "people", "id": "9", "attributes": {"first-name": "Dan", "twitter": "dgeb"}},
            {
                "type": "comments", "id": "5",
                "attributes": {"body": "First!"},
                "relationships": {"author": {"data": {"type": "people", "id": "2"}}}
            },
            {
                "type": "comments", "id": "12",
                "attributes": {"body": "I like XML better"},
                "relationships": {"author": {"data": {"type": "people", "id": "9"}}}
            },
            {"type": "people", "id": "2", "attributes": {"first-name": "Ann"}}
        ],
        "meta": {"total": 2}
    })
}

const FULL_INCLUDE: &str = "author,comments.author";

#[test]
fn roundtrip_through_encoder_with_included_resources() {
    let options = DecoderOptions::default();
    let flat = decode(&blog_doc(), Some(FULL_INCLUDE), &options).unwrap();

    let mut additional = serde_json::Map::new();
    additional.insert("meta".into(), flat["meta"].clone());
    let mut encoded = encode(&flat["data"], Some(&additional), &EncoderOptions::default()).unwrap();
    encoded["included"] = blog_doc()["included"].clone();

    let again = decode(&encoded, Some(FULL_INCLUDE), &options).unwrap();
    assert_eq!(again, flat);

    // Eager decoding of an acyclic document agrees with the full include list.
    let eager = decode(&encoded, None, &options).unwrap();
    assert_eq!(eager, flat);
}

#[test]
fn roundtrip_of_reference_only_relationships() {
    let flat = json!({
        "type": "articles", "id": "1", "title": "Hi",
        "author": {"type": "people", "id": "9"},
        "comments": [{"type": "comments", "id": "5"}]
    });
    let encoded = encode(&flat, None, &EncoderOptions::default()).unwrap();
    let decoded = decode(&encoded, None, &DecoderOptions::new(true)).unwrap();
    assert_eq!(decoded, json!({"data": flat}));
}

#[test]
fn roundtrip_of_meta_in_common_namespace() {
    let flat = json!({"type": "articles", "id": "1", "title": "Hi", "meta": {"views": 10}});
    for options in [EncoderOptions::default(), EncoderOptions::new(true)] {
        let encoded = encode(&flat, None, &options).unwrap();
        let decoded = decode(&encoded, None, &DecoderOptions::default()).unwrap();
        assert_eq!(decoded, json!({"data": flat}));
    }
}

#[test]
fn include_list_resolution_matches_eager_on_acyclic_documents() {
    let eager = decode(&blog_doc(), None, &DecoderOptions::default()).unwrap();
    let scoped = decode(&blog_doc(), Some(FULL_INCLUDE), &DecoderOptions::default()).unwrap();
    assert_eq!(eager, scoped);

    let tree = IncludeTree::parse(FULL_INCLUDE);
    assert_eq!(
        decode(&blog_doc(), Some(&tree.to_include_list()), &DecoderOptions::default()).unwrap(),
        scoped
    );
}

#[test]
fn decoded_cardinality_follows_linkage() {
    let flat = decode(&blog_doc(), None, &DecoderOptions::default()).unwrap();
    let first = &flat["data"][0];
    assert!(first["author"].is_object());
    assert_eq!(first["comments"].as_array().map(Vec::len), Some(2));
    assert_eq!(first["comments"][0]["author"]["first-name"], json!("Ann"));

    let second = &flat["data"][1];
    assert!(second["author"].is_null());
    assert_eq!(second["comments"], json!([]));
}
