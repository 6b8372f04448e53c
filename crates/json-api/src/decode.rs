//! JSON:API → flat JSON.
//!
//! Every resource of `data` and `included` is indexed by its [`ResourceId`].
//! Each top-level resource is then flattened: `attributes` are lifted next to
//! `type` and `id`, and each relationship is replaced by the flattened
//! resource(s) it references.
//!
//! Without an include list every reachable relationship is followed. A
//! resource met again on its own descent path is emitted as a `{type, id}`
//! stub. A resource that took part in a cycle is expanded at most once per
//! top-level resource; later references to it within that top-level resource
//! are stubs too, so output stays linear in the number of references. With an
//! include list only the named relationship paths are followed.
//!
//! Duplicate identifiers: the first occurrence wins. `data` is indexed
//! before `included`, so a resource present in both resolves to its `data`
//! version everywhere in the output.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::include::IncludeTree;
use crate::types::{
    DecoderOptions, JsonApiError, ResourceId, ATTRIBUTES, DATA, ID, INCLUDED, META,
    RELATIONSHIPS, TYPE,
};
use crate::util::{object_list, optional_object, Linkage, Object};

/// Converts a JSON:API document into flat JSON.
///
/// `include_list` selects the include-list strategy; `None` resolves every
/// reachable relationship.
///
/// # Example
///
/// ```
/// use json_api::{decode, DecoderOptions};
/// use serde_json::json;
///
/// let doc = json!({
///     "data": {
///         "type": "articles", "id": "1",
///         "attributes": {"title": "Hi"},
///         "relationships": {"author": {"data": {"type": "people", "id": "9"}}}
///     },
///     "included": [{"type": "people", "id": "9", "attributes": {"name": "Dan"}}]
/// });
/// let flat = decode(&doc, None, &DecoderOptions::default()).unwrap();
/// assert_eq!(flat, json!({
///     "data": {
///         "type": "articles", "id": "1", "title": "Hi",
///         "author": {"type": "people", "id": "9", "name": "Dan"}
///     }
/// }));
/// ```
///
/// # Errors
///
/// - `JsonApiError::MalformedInput` - the document is not an object, or
///   `data`/`included`/`attributes` have the wrong shape
/// - `JsonApiError::MissingIdentifier` - a resource or reference lacks a
///   string `type` or `id`
/// - `JsonApiError::MalformedRelationship` - a relationship entry or its
///   `data` has the wrong shape
pub fn decode(
    document: &Value,
    include_list: Option<&str>,
    options: &DecoderOptions,
) -> Result<Value, JsonApiError> {
    let root = document
        .as_object()
        .ok_or_else(|| JsonApiError::MalformedInput("document must be an object".into()))?;

    let data = object_list(root, DATA)?.unwrap_or_default();
    let included = object_list(root, INCLUDED)?.unwrap_or_default();
    let index = ResourceIndex::build(&data, &included)?;

    tracing::debug!(
        data = data.len(),
        included = included.len(),
        indexed = index.resources.len(),
        include_list = include_list.unwrap_or(""),
        "decoding JSON:API document"
    );

    let objects = match include_list {
        Some(list) => {
            let tree = IncludeTree::parse(list);
            let scoped = Scoped {
                index: &index,
                options,
            };
            index
                .top_level
                .iter()
                .map(|id| scoped.resolve(id, index.get(id)?, &tree))
                .collect::<Result<Vec<_>, _>>()?
        }
        None => {
            let mut eager = Eager::new(&index, options);
            let mut objects = Vec::with_capacity(index.top_level.len());
            for id in &index.top_level {
                let resolved = eager.resolve_top_level(id, index.get(id)?)?;
                objects.push(resolved.value);
            }
            objects
        }
    };

    let mut out = Object::with_capacity(root.len());
    let mut objects = Some(objects);
    for (key, value) in root {
        match key.as_str() {
            INCLUDED => {}
            DATA => {
                let decoded = match (value, objects.take()) {
                    (Value::Object(_), Some(objects)) => {
                        objects.into_iter().next().unwrap_or(Value::Null)
                    }
                    (Value::Array(_), Some(objects)) => Value::Array(objects),
                    _ => Value::Null,
                };
                out.insert(key.clone(), decoded);
            }
            _ => {
                out.insert(key.clone(), value.clone());
            }
        }
    }
    Ok(Value::Object(out))
}

/// Parses `bytes` as JSON and decodes it with [`decode`].
///
/// Invalid JSON is reported as `JsonApiError::MalformedInput`.
pub fn decode_slice(
    bytes: &[u8],
    include_list: Option<&str>,
    options: &DecoderOptions,
) -> Result<Value, JsonApiError> {
    let document: Value = serde_json::from_slice(bytes)
        .map_err(|e| JsonApiError::MalformedInput(e.to_string()))?;
    decode(&document, include_list, options)
}

/// Same as [`decode_slice`], serializing the flat document back to bytes.
pub fn decode_to_vec(
    bytes: &[u8],
    include_list: Option<&str>,
    options: &DecoderOptions,
) -> Result<Vec<u8>, JsonApiError> {
    let flat = decode_slice(bytes, include_list, options)?;
    // A `Value` always serializes; the error arm is unreachable.
    serde_json::to_vec(&flat).map_err(|e| JsonApiError::MalformedInput(e.to_string()))
}

// ── Index ─────────────────────────────────────────────────────────────────

struct ResourceIndex<'a> {
    /// Identifiers of `data`, in document order.
    top_level: Vec<ResourceId>,
    resources: HashMap<ResourceId, &'a Object>,
}

impl<'a> ResourceIndex<'a> {
    fn build(data: &[&'a Object], included: &[&'a Object]) -> Result<Self, JsonApiError> {
        let mut top_level = Vec::with_capacity(data.len());
        let mut resources = HashMap::with_capacity(data.len() + included.len());
        for (position, resource) in data.iter().chain(included).enumerate() {
            let id = ResourceId::from_object(resource)?;
            if position < data.len() {
                top_level.push(id.clone());
            }
            // First occurrence wins.
            resources.entry(id).or_insert(*resource);
        }
        Ok(Self {
            top_level,
            resources,
        })
    }

    fn get(&self, id: &ResourceId) -> Result<&'a Object, JsonApiError> {
        self.resources
            .get(id)
            .copied()
            .ok_or_else(|| JsonApiError::MissingIdentifier(id.to_stub()))
    }

    fn lookup(&self, id: &ResourceId) -> Option<&'a Object> {
        self.resources.get(id).copied()
    }
}

// ── Shared flattening ─────────────────────────────────────────────────────

/// `meta`, then `attributes`, then `type` and `id`.
fn flatten_fields(id: &ResourceId, resource: &Object) -> Result<Object, JsonApiError> {
    let attributes = optional_object(resource, ATTRIBUTES)?;
    let mut flat = Object::with_capacity(attributes.map_or(0, Object::len) + 3);
    if let Some(meta) = resource.get(META).filter(|m| !m.is_null()) {
        flat.insert(META.into(), meta.clone());
    }
    if let Some(attributes) = attributes {
        for (key, value) in attributes {
            flat.insert(key.clone(), value.clone());
        }
    }
    flat.insert(TYPE.into(), Value::String(id.kind.clone()));
    flat.insert(ID.into(), Value::String(id.id.clone()));
    Ok(flat)
}

/// The validated `relationships` entries of a resource, in document order.
fn relationships(resource: &Object) -> Result<Vec<(&String, Linkage<'_>)>, JsonApiError> {
    match resource.get(RELATIONSHIPS) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Object(entries)) => entries
            .iter()
            .map(|(name, entry)| Linkage::parse(name, entry).map(|linkage| (name, linkage)))
            .collect(),
        Some(other) => Err(JsonApiError::MalformedRelationship {
            name: RELATIONSHIPS.into(),
            value: other.clone(),
        }),
    }
}

/// Target of a reference that is not present in the document.
fn unresolved(id: ResourceId, options: &DecoderOptions) -> Option<Value> {
    tracing::trace!(resource = %id, "relationship target not in document");
    options
        .parse_not_included_relationships
        .then(|| id.to_stub())
}

// ── Eager strategy ────────────────────────────────────────────────────────

struct Resolved {
    value: Value,
    /// False if a cycle was cut somewhere below this value.
    complete: bool,
}

struct Eager<'i, 'a> {
    index: &'i ResourceIndex<'a>,
    options: &'i DecoderOptions,
    /// Resources on the current descent path.
    resolving: HashSet<ResourceId>,
    /// Resources expanded under the current top-level resource whose
    /// expansion cut a cycle.
    expanded: HashSet<ResourceId>,
    /// Fully resolved resources. Only cycle-free results are stored since
    /// those do not depend on the descent path.
    memo: HashMap<ResourceId, Value>,
}

impl<'i, 'a> Eager<'i, 'a> {
    fn new(index: &'i ResourceIndex<'a>, options: &'i DecoderOptions) -> Self {
        Self {
            index,
            options,
            resolving: HashSet::new(),
            expanded: HashSet::new(),
            memo: HashMap::new(),
        }
    }

    fn resolve_top_level(
        &mut self,
        id: &ResourceId,
        resource: &'a Object,
    ) -> Result<Resolved, JsonApiError> {
        self.expanded.clear();
        self.resolve(id, resource)
    }

    fn resolve(&mut self, id: &ResourceId, resource: &'a Object) -> Result<Resolved, JsonApiError> {
        if let Some(value) = self.memo.get(id) {
            return Ok(Resolved {
                value: value.clone(),
                complete: true,
            });
        }
        if self.resolving.contains(id) || self.expanded.contains(id) {
            tracing::trace!(resource = %id, "relationship cycle, emitting stub");
            return Ok(Resolved {
                value: id.to_stub(),
                complete: false,
            });
        }

        self.resolving.insert(id.clone());
        let mut flat = flatten_fields(id, resource)?;
        let mut complete = true;
        for (name, linkage) in relationships(resource)? {
            let resolved = self.resolve_linkage(&linkage)?;
            complete &= resolved.complete;
            flat.insert(name.clone(), resolved.value);
        }
        self.resolving.remove(id);

        let value = Value::Object(flat);
        if complete {
            self.memo.insert(id.clone(), value.clone());
        } else {
            self.expanded.insert(id.clone());
        }
        Ok(Resolved { value, complete })
    }

    fn resolve_linkage(&mut self, linkage: &Linkage<'_>) -> Result<Resolved, JsonApiError> {
        match linkage {
            Linkage::Empty => Ok(Resolved {
                value: Value::Null,
                complete: true,
            }),
            Linkage::One(reference) => Ok(self.target(reference)?.unwrap_or(Resolved {
                value: Value::Null,
                complete: true,
            })),
            Linkage::Many(references) => {
                let mut values = Vec::with_capacity(references.len());
                let mut complete = true;
                for reference in references {
                    if let Some(resolved) = self.target(reference)? {
                        complete &= resolved.complete;
                        values.push(resolved.value);
                    }
                }
                Ok(Resolved {
                    value: Value::Array(values),
                    complete,
                })
            }
        }
    }

    fn target(&mut self, reference: &Object) -> Result<Option<Resolved>, JsonApiError> {
        let id = ResourceId::from_object(reference)?;
        match self.index.lookup(&id) {
            Some(resource) => self.resolve(&id, resource).map(Some),
            None => Ok(unresolved(id, self.options).map(|value| Resolved {
                value,
                complete: true,
            })),
        }
    }
}

// ── Include-list strategy ─────────────────────────────────────────────────

struct Scoped<'i, 'a> {
    index: &'i ResourceIndex<'a>,
    options: &'i DecoderOptions,
}

impl Scoped<'_, '_> {
    fn resolve(
        &self,
        id: &ResourceId,
        resource: &Object,
        tree: &IncludeTree,
    ) -> Result<Value, JsonApiError> {
        let mut flat = flatten_fields(id, resource)?;
        for (name, linkage) in relationships(resource)? {
            if let Some(sub_tree) = tree.get(name) {
                flat.insert(name.clone(), self.resolve_linkage(&linkage, sub_tree)?);
            } else if self.options.parse_not_included_relationships {
                flat.insert(name.clone(), reference_stubs(&linkage)?);
            }
        }
        Ok(Value::Object(flat))
    }

    fn resolve_linkage(
        &self,
        linkage: &Linkage<'_>,
        tree: &IncludeTree,
    ) -> Result<Value, JsonApiError> {
        match linkage {
            Linkage::Empty => Ok(Value::Null),
            Linkage::One(reference) => Ok(self.target(reference, tree)?.unwrap_or(Value::Null)),
            Linkage::Many(references) => {
                let mut values = Vec::with_capacity(references.len());
                for reference in references {
                    if let Some(value) = self.target(reference, tree)? {
                        values.push(value);
                    }
                }
                Ok(Value::Array(values))
            }
        }
    }

    fn target(&self, reference: &Object, tree: &IncludeTree) -> Result<Option<Value>, JsonApiError> {
        let id = ResourceId::from_object(reference)?;
        match self.index.lookup(&id) {
            Some(resource) => self.resolve(&id, resource, tree).map(Some),
            None => Ok(unresolved(id, self.options)),
        }
    }
}

/// Linkage of a relationship outside the include list, kept as references.
fn reference_stubs(linkage: &Linkage<'_>) -> Result<Value, JsonApiError> {
    match linkage {
        Linkage::Empty => Ok(Value::Null),
        Linkage::One(reference) => {
            ResourceId::from_object(reference)?;
            Ok(linkage.raw())
        }
        Linkage::Many(references) => {
            for reference in references {
                ResourceId::from_object(reference)?;
            }
            Ok(linkage.raw())
        }
    }
}
