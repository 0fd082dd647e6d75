//! Read views over deserialized resources.
//!
//! A [`Projection`] is a cheap `(document, node)` handle. Attribute and
//! relationship access goes through a single [`Projection::get`] dispatcher
//! with a fixed priority order; the result is a tagged [`Field`] so that an
//! absent field is distinguishable from a present-but-null one.

use serde_json::{Map, Value};

use crate::types::{Document, NodeId, Rel};

/// Result of a named field lookup on a projection.
#[derive(Debug, Clone)]
pub enum Field<'a> {
    /// The name matches neither an attribute nor a relationship.
    Absent,
    /// The field is present and null (null attribute or empty to-one
    /// relationship).
    Null,
    /// A non-null attribute value.
    Value(&'a Value),
    /// A to-one relationship.
    One(Projection<'a>),
    /// A to-many relationship.
    Many(Vec<Projection<'a>>),
}

impl<'a> Field<'a> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Field::Null)
    }

    pub fn as_value(&self) -> Option<&'a Value> {
        match self {
            Field::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        self.as_value().and_then(Value::as_str)
    }

    pub fn as_one(&self) -> Option<&Projection<'a>> {
        match self {
            Field::One(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_many(&self) -> Option<&[Projection<'a>]> {
        match self {
            Field::Many(ps) => Some(ps),
            _ => None,
        }
    }
}

/// Read view over one resource node of a [`Document`].
///
/// Projections are created per node and live no longer than their document;
/// there is no public mutation. Conversion back to the wire goes through
/// [`Projection::to_wire`], whose `root` flag controls whether the fragment
/// is wrapped in a `{data, meta}` document envelope.
#[derive(Debug, Clone, Copy)]
pub struct Projection<'a> {
    doc: &'a Document,
    node: NodeId,
}

impl<'a> Projection<'a> {
    pub(crate) fn new(doc: &'a Document, node: NodeId) -> Self {
        Projection { doc, node }
    }

    pub fn node_id(&self) -> NodeId {
        self.node
    }

    pub fn id(&self) -> Option<&'a str> {
        self.doc.node(self.node).id.as_deref()
    }

    pub fn type_name(&self) -> &'a str {
        &self.doc.node(self.node).resource_type
    }

    pub fn meta(&self) -> Option<&'a Map<String, Value>> {
        self.doc.node(self.node).meta.as_ref()
    }

    pub fn attributes(&self) -> &'a Map<String, Value> {
        &self.doc.node(self.node).attributes
    }

    /// Look up a named field: attributes first, then relationships, then
    /// [`Field::Absent`]. Resource identity and meta are reached through the
    /// typed accessors [`Projection::id`], [`Projection::type_name`] and
    /// [`Projection::meta`] instead of this dispatcher.
    pub fn get(&self, name: &str) -> Field<'a> {
        let node = self.doc.node(self.node);

        if let Some(value) = node.attributes.get(name) {
            return if value.is_null() {
                Field::Null
            } else {
                Field::Value(value)
            };
        }

        match node.relationships.get(name) {
            Some(Rel::Null) => Field::Null,
            Some(Rel::One(id)) => Field::One(Projection::new(self.doc, *id)),
            Some(Rel::Many(ids)) => Field::Many(
                ids.iter()
                    .map(|id| Projection::new(self.doc, *id))
                    .collect(),
            ),
            None => Field::Absent,
        }
    }

    /// Convert back to a wire value.
    ///
    /// With `root` set, the resource fragment is wrapped as `{data, meta}`.
    /// Nested relationship values render their own attributes but never
    /// their own relationships, which keeps the conversion bounded on
    /// cyclic graphs.
    pub fn to_wire(&self, root: bool) -> Value {
        let fragment = self.fragment(true);
        if !root {
            return fragment;
        }

        let mut out = Map::new();
        out.insert("data".to_owned(), fragment);
        if let Some(meta) = self.meta() {
            out.insert("meta".to_owned(), Value::Object(meta.clone()));
        }
        Value::Object(out)
    }

    fn fragment(&self, expand: bool) -> Value {
        let node = self.doc.node(self.node);
        let mut out = Map::new();

        out.insert(
            "type".to_owned(),
            Value::String(node.resource_type.clone()),
        );
        if let Some(id) = &node.id {
            out.insert("id".to_owned(), Value::String(id.clone()));
        }
        if !node.attributes.is_empty() {
            out.insert(
                "attributes".to_owned(),
                Value::Object(node.attributes.clone()),
            );
        }
        if expand && !node.relationships.is_empty() {
            let mut rels = Map::new();
            for (name, rel) in &node.relationships {
                let value = match rel {
                    Rel::Null => Value::Null,
                    Rel::One(id) => Projection::new(self.doc, *id).fragment(false),
                    Rel::Many(ids) => Value::Array(
                        ids.iter()
                            .map(|id| Projection::new(self.doc, *id).fragment(false))
                            .collect(),
                    ),
                };
                rels.insert(name.clone(), value);
            }
            out.insert("relationships".to_owned(), Value::Object(rels));
        }

        Value::Object(out)
    }
}

/// Two projections are equal when their wire conversions are deeply equal.
impl PartialEq for Projection<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.to_wire(true) == other.to_wire(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::deserialize::deserialize;
    use crate::projection::Field;
    use serde_json::json;

    #[test]
    fn test_attribute_shadows_relationship() {
        let doc = deserialize(&json!({
            "data": {
                "type": "articles",
                "id": "1",
                "attributes": { "author": "inline" },
                "relationships": {
                    "author": { "data": { "type": "people", "id": "9" } }
                }
            }
        }))
        .unwrap();

        let root = doc.root().unwrap();
        match root.get("author") {
            Field::Value(v) => assert_eq!(v, &json!("inline")),
            other => panic!("expected attribute value, got {:?}", other),
        }
    }

    #[test]
    fn test_absent_vs_null() {
        let doc = deserialize(&json!({
            "data": {
                "type": "articles",
                "id": "1",
                "attributes": { "subtitle": null },
                "relationships": { "author": { "data": null } }
            }
        }))
        .unwrap();

        let root = doc.root().unwrap();
        assert!(root.get("subtitle").is_null());
        assert!(root.get("author").is_null());
        assert!(root.get("no_such_field").is_absent());
    }

    #[test]
    fn test_to_wire_envelope_flag() {
        let doc = deserialize(&json!({
            "data": {
                "type": "articles",
                "id": "1",
                "attributes": { "title": "Hello" }
            },
            "meta": { "lang": "en" }
        }))
        .unwrap();

        let root = doc.root().unwrap();
        assert_eq!(
            root.to_wire(true),
            json!({
                "data": {
                    "type": "articles",
                    "id": "1",
                    "attributes": { "title": "Hello" }
                },
                "meta": { "lang": "en" }
            })
        );
        assert_eq!(
            root.to_wire(false),
            json!({
                "type": "articles",
                "id": "1",
                "attributes": { "title": "Hello" }
            })
        );
    }

    #[test]
    fn test_nested_relationships_render_one_level_only() {
        // a -> b -> c: the root fragment expands `b` with its attributes,
        // but b's own relationships are not re-descended into.
        let doc = deserialize(&json!({
            "data": {
                "type": "a",
                "id": "1",
                "relationships": { "b": { "data": { "type": "b", "id": "2" } } }
            },
            "included": [
                {
                    "type": "b",
                    "id": "2",
                    "attributes": { "name": "bee" },
                    "relationships": { "c": { "data": { "type": "c", "id": "3" } } }
                },
                { "type": "c", "id": "3", "attributes": { "name": "sea" } }
            ]
        }))
        .unwrap();

        let wire = doc.root().unwrap().to_wire(true);
        assert_eq!(
            wire["data"]["relationships"]["b"],
            json!({ "type": "b", "id": "2", "attributes": { "name": "bee" } })
        );
    }

    #[test]
    fn test_projection_equality() {
        let raw = json!({
            "data": { "type": "t", "id": "1", "attributes": { "a": 1 } }
        });
        let d1 = deserialize(&raw).unwrap();
        let d2 = deserialize(&raw).unwrap();
        assert_eq!(d1.root().unwrap(), d2.root().unwrap());
    }
}
