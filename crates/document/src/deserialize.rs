//! Two-phase deserialization of JSON:API documents into resource graphs.
//!
//! The main entry point is [`deserialize`]. Phase one walks `included` and
//! `data`, converting every resource object into an arena node and indexing
//! it by linkage; relationship linkages are not resolved yet but pushed onto
//! a deferred queue. Phase two executes the queue in order, assigning node
//! indices to relationship slots. Because every node exists before any slot
//! is assigned, forward references and cycles resolve regardless of the
//! declaration order inside `included`, with no recursive re-entry.

use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::DocumentError;
use crate::types::{Document, Linkage, NodeId, Rel, ResourceNode, Root};

/// Accepted deserializer input.
pub enum Input<'a> {
    /// Raw JSON text, parsed first.
    Text(&'a str),
    /// An already-parsed JSON value.
    Json(&'a Value),
    /// An already-deserialized document, returned unchanged.
    Document(Document),
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(text: &'a str) -> Self {
        Input::Text(text)
    }
}

impl<'a> From<&'a String> for Input<'a> {
    fn from(text: &'a String) -> Self {
        Input::Text(text)
    }
}

impl<'a> From<&'a Value> for Input<'a> {
    fn from(value: &'a Value) -> Self {
        Input::Json(value)
    }
}

impl From<Document> for Input<'_> {
    fn from(doc: Document) -> Self {
        Input::Document(doc)
    }
}

/// Deserialize a JSON:API document into a resource graph.
///
/// Passing an already-deserialized [`Document`] returns it unchanged, so
/// the operation is idempotent and composes with pass-through pipelines.
pub fn deserialize<'a>(input: impl Into<Input<'a>>) -> Result<Document, DocumentError> {
    match input.into() {
        Input::Document(doc) => Ok(doc),
        Input::Text(text) => {
            let parsed: Value = serde_json::from_str(text)?;
            from_value(&parsed)
        }
        Input::Json(value) => from_value(value),
    }
}

/// Deserialize an already-parsed JSON:API document.
pub fn from_value(input: &Value) -> Result<Document, DocumentError> {
    let doc = input.as_object().ok_or_else(|| {
        DocumentError::bad_format(format!(
            "document must be an object, got {}",
            json_type_name(input)
        ))
    })?;

    // A document carrying `errors` signals a producer failure; it is never
    // valid deserializer input.
    if let Some(errors) = doc.get("errors") {
        return Err(DocumentError::bad_format(format!(
            "input is an error document: {}",
            errors
        )));
    }

    let mut builder = Builder::default();

    // Index every included resource before any relationship resolution so
    // that declaration order inside the array never matters.
    if let Some(included) = doc.get("included") {
        let arr = included.as_array().ok_or_else(|| {
            DocumentError::bad_format(format!(
                "`included` must be an array, got {}",
                json_type_name(included)
            ))
        })?;
        for object in arr {
            let key = Linkage::from_value(object)?;
            let node = builder.convert_resource(object)?;
            builder.index.insert(key, node);
        }
    }

    let doc_meta = match doc.get("meta") {
        None | Some(Value::Null) => None,
        Some(Value::Object(m)) => Some(m.clone()),
        Some(other) => {
            return Err(DocumentError::bad_format(format!(
                "`meta` must be an object, got {}",
                json_type_name(other)
            )))
        }
    };

    let (root, meta) = match doc.get("data") {
        Some(Value::Array(items)) => {
            let ids = items
                .iter()
                .map(|item| builder.convert_resource(item))
                .collect::<Result<Vec<NodeId>, DocumentError>>()?;
            (Root::Many(ids), doc_meta)
        }
        Some(data @ Value::Object(_)) => {
            let id = builder.convert_resource(data)?;
            // Document meta is the base; resource meta overlays it per key.
            if let Some(base) = doc_meta {
                let mut merged = base;
                if let Some(own) = builder.nodes[id].meta.take() {
                    for (k, v) in own {
                        merged.insert(k, v);
                    }
                }
                builder.nodes[id].meta = Some(merged);
            }
            (Root::One(id), None)
        }
        other => {
            return Err(DocumentError::bad_format(format!(
                "`data` must be an array or object, got {}",
                other.map_or("nothing", json_type_name)
            )))
        }
    };

    builder.resolve_pending()?;

    Ok(Document {
        nodes: builder.nodes,
        root,
        meta,
    })
}

// ── Two-phase builder ───────────────────────────────────────────────

#[derive(Clone)]
struct PendingLink {
    node: NodeId,
    relation: String,
    target: PendingTarget,
}

#[derive(Clone)]
enum PendingTarget {
    One(Value),
    Many(Vec<Value>),
}

#[derive(Default)]
struct Builder {
    nodes: Vec<ResourceNode>,
    index: HashMap<Linkage, NodeId>,
    pending: Vec<PendingLink>,
}

impl Builder {
    /// Convert one resource object into an arena node. Relationship data is
    /// not resolved here; linkages are queued for the deferred pass.
    fn convert_resource(&mut self, value: &Value) -> Result<NodeId, DocumentError> {
        let obj = value.as_object().ok_or_else(|| {
            DocumentError::bad_format(format!(
                "resource object must be an object, got {}",
                json_type_name(value)
            ))
        })?;

        let resource_type = obj
            .get("type")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| DocumentError::bad_format("resource object is missing `type`"))?;

        let id = match obj.get("id") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        let attributes = match obj.get("attributes") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(m)) => m.clone(),
            Some(other) => {
                return Err(DocumentError::bad_format(format!(
                    "`attributes` must be an object, got {}",
                    json_type_name(other)
                )))
            }
        };

        let meta = match obj.get("meta") {
            None | Some(Value::Null) => None,
            Some(Value::Object(m)) => Some(m.clone()),
            Some(other) => {
                return Err(DocumentError::bad_format(format!(
                    "resource `meta` must be an object, got {}",
                    json_type_name(other)
                )))
            }
        };

        let node = self.nodes.len();
        self.nodes.push(ResourceNode {
            id,
            resource_type,
            attributes,
            relationships: Default::default(),
            meta,
        });

        if let Some(rels) = obj.get("relationships") {
            let rels = rels.as_object().ok_or_else(|| {
                DocumentError::bad_format(format!(
                    "`relationships` must be an object, got {}",
                    json_type_name(rels)
                ))
            })?;

            for (name, rel_value) in rels {
                let content = match rel_value {
                    Value::Null => None,
                    Value::Object(m) => m.get("data"),
                    other => {
                        return Err(DocumentError::bad_format(format!(
                            "relationship `{}` must be an object, got {}",
                            name,
                            json_type_name(other)
                        )))
                    }
                };

                match content {
                    None | Some(Value::Null) => {
                        self.nodes[node].relationships.insert(name.clone(), Rel::Null);
                    }
                    Some(one @ Value::Object(_)) => {
                        self.pending.push(PendingLink {
                            node,
                            relation: name.clone(),
                            target: PendingTarget::One(one.clone()),
                        });
                    }
                    Some(Value::Array(items)) => {
                        self.pending.push(PendingLink {
                            node,
                            relation: name.clone(),
                            target: PendingTarget::Many(items.clone()),
                        });
                    }
                    Some(other) => {
                        return Err(DocumentError::bad_format(format!(
                            "relationship `{}` data type not expected: got {}",
                            name,
                            json_type_name(other)
                        )))
                    }
                }
            }
        }

        Ok(node)
    }

    /// Execute the deferred queue in enqueue order. Resolving a non-indexed
    /// linkage synthesizes its node, which may enqueue further links; the
    /// loop keeps going until the queue drains.
    fn resolve_pending(&mut self) -> Result<(), DocumentError> {
        let mut i = 0;
        while i < self.pending.len() {
            let link = self.pending[i].clone();
            let resolved = match &link.target {
                PendingTarget::One(value) => Rel::One(self.resolve_linkage(value)?),
                PendingTarget::Many(items) => {
                    let mut ids = Vec::with_capacity(items.len());
                    for item in items {
                        ids.push(self.resolve_linkage(item)?);
                    }
                    Rel::Many(ids)
                }
            };
            self.nodes[link.node]
                .relationships
                .insert(link.relation, resolved);
            i += 1;
        }
        Ok(())
    }

    /// Map a linkage to its indexed node, or synthesize a node from the
    /// linkage content itself when the resource was not listed in
    /// `included` (non-included single-resource relationship data).
    fn resolve_linkage(&mut self, value: &Value) -> Result<NodeId, DocumentError> {
        let key = Linkage::from_value(value)?;
        if let Some(&id) = self.index.get(&key) {
            return Ok(id);
        }
        let id = self.convert_resource(value)?;
        self.index.insert(key, id);
        Ok(id)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
