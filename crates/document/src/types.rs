//! Resource-graph representation of a deserialized JSON:API document.
//!
//! Nodes live in an index arena owned by the [`Document`]; relationship
//! slots hold [`NodeId`]s rather than references, so cyclic graphs need no
//! shared mutable state and the deferred-resolution pass can assign slots
//! after every node exists.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::DocumentError;
use crate::projection::Projection;

/// A `(type, id)` pair identifying one resource inside a document.
///
/// Used both as the reference-index key during deserialization and as the
/// wire serialization of a resource-identifier object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Linkage {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
}

impl Linkage {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Linkage {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Extract the linkage key of a resource object.
    ///
    /// `type` is required. A missing `id` maps to the empty string so that
    /// partial linkages can still be indexed.
    pub fn from_value(value: &Value) -> Result<Linkage, DocumentError> {
        let resource_type = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| DocumentError::bad_format("resource object is missing `type`"))?;

        let id = match value.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        Ok(Linkage::new(resource_type, id))
    }
}

/// Index of a node inside its owning [`Document`] arena.
pub type NodeId = usize;

/// A resolved relationship slot on a resource node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rel {
    /// The relationship was declared with null (or absent) data.
    Null,
    /// To-one relationship.
    One(NodeId),
    /// To-many relationship.
    Many(Vec<NodeId>),
}

/// One deserialized resource.
///
/// Once a node is placed into the reference index its `(type, id)` never
/// changes. Relationship slots are populated only by the deferred-resolution
/// pass, which completes before `deserialize` returns.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceNode {
    pub id: Option<String>,
    pub resource_type: String,
    pub attributes: Map<String, Value>,
    pub relationships: BTreeMap<String, Rel>,
    pub meta: Option<Map<String, Value>>,
}

/// Root of a document: one resource or a homogeneous collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Root {
    One(NodeId),
    Many(Vec<NodeId>),
}

/// A deserialized JSON:API document: the node arena plus its root.
///
/// For a single-resource document, document-level meta is merged onto the
/// root node during deserialization (resource meta wins per key). For a
/// collection document it is kept at the document level.
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) nodes: Vec<ResourceNode>,
    pub(crate) root: Root,
    pub(crate) meta: Option<Map<String, Value>>,
}

impl Document {
    pub fn node(&self, id: NodeId) -> &ResourceNode {
        &self.nodes[id]
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.root, Root::Many(_))
    }

    /// Collection-level meta. Single-resource documents carry their meta on
    /// the root node instead; see [`Projection::meta`].
    pub fn meta(&self) -> Option<&Map<String, Value>> {
        self.meta.as_ref()
    }

    /// The root resource of a single-resource document.
    pub fn root(&self) -> Option<Projection<'_>> {
        match &self.root {
            Root::One(id) => Some(Projection::new(self, *id)),
            Root::Many(_) => None,
        }
    }

    /// All root resources: one element for a single-resource document.
    pub fn roots(&self) -> Vec<Projection<'_>> {
        match &self.root {
            Root::One(id) => vec![Projection::new(self, *id)],
            Root::Many(ids) => ids.iter().map(|id| Projection::new(self, *id)).collect(),
        }
    }

    /// Convert the whole document back into a wire value.
    pub fn to_wire(&self) -> Value {
        match &self.root {
            Root::One(id) => Projection::new(self, *id).to_wire(true),
            Root::Many(ids) => {
                let data: Vec<Value> = ids
                    .iter()
                    .map(|id| Projection::new(self, *id).to_wire(false))
                    .collect();
                let mut out = Map::new();
                out.insert("data".to_owned(), Value::Array(data));
                if let Some(meta) = &self.meta {
                    out.insert("meta".to_owned(), Value::Object(meta.clone()));
                }
                Value::Object(out)
            }
        }
    }
}

/// Structural equality via the wire conversion, so two documents built from
/// differently-ordered inputs compare equal when they describe the same graph.
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.to_wire() == other.to_wire()
    }
}
