//! Full-cycle tests: deserialize a wire document, expose the resulting
//! graph through the `Resource` trait, render it, and compare with the
//! original input.
//!
//! The `View` adapter mirrors what a host does when it serves previously
//! ingested documents: each node becomes one entity, with relation links
//! wired after all views exist so shared and cyclic references resolve to
//! the same adapter instance.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use prism_document::{deserialize, Document, NodeId, Rel};
use prism_model::{Collection, FieldDescriptor, Related, RelationDescriptor, Resource};
use prism_render::Renderer;
use serde_json::{json, Value};

enum Peer<'a> {
    One(&'a View<'a>),
    Many(Vec<&'a View<'a>>),
}

struct View<'a> {
    doc: &'a Document,
    node: NodeId,
    peers: RefCell<Vec<(String, Peer<'a>)>>,
}

impl<'a> Resource for View<'a> {
    fn type_name(&self) -> &str {
        &self.doc.node(self.node).resource_type
    }

    fn id(&self) -> String {
        self.doc.node(self.node).id.clone().unwrap_or_default()
    }

    fn fields(&self) -> Vec<FieldDescriptor> {
        self.doc
            .node(self.node)
            .attributes
            .keys()
            .map(|name| FieldDescriptor::visible(name.clone()))
            .collect()
    }

    fn relations(&self) -> Vec<RelationDescriptor> {
        self.doc
            .node(self.node)
            .relationships
            .iter()
            .filter_map(|(name, rel)| match rel {
                Rel::Null => None,
                Rel::One(target) => Some(RelationDescriptor::to_one(
                    name.clone(),
                    self.doc.node(*target).resource_type.clone(),
                )),
                Rel::Many(targets) => {
                    let related_type = targets
                        .first()
                        .map(|t| self.doc.node(*t).resource_type.clone())
                        .unwrap_or_default();
                    Some(RelationDescriptor::to_many(name.clone(), related_type))
                }
            })
            .collect()
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        self.doc.node(self.node).attributes.get(name).cloned()
    }

    fn related(&self, name: &str) -> Related<'_> {
        for (peer_name, peer) in self.peers.borrow().iter() {
            if peer_name.as_str() == name {
                return match peer {
                    Peer::One(view) => Related::One(*view),
                    Peer::Many(views) => Related::Many(
                        views.iter().map(|v| *v as &dyn Resource).collect(),
                    ),
                };
            }
        }
        Related::None
    }

    fn included(&self) -> Vec<String> {
        self.peers
            .borrow()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }
}

/// Every node reachable from the document roots, roots first.
fn reachable_ids(doc: &Document) -> Vec<NodeId> {
    let mut ids: Vec<NodeId> = doc.roots().iter().map(|p| p.node_id()).collect();
    let mut seen: HashSet<NodeId> = ids.iter().copied().collect();
    let mut cursor = 0;
    while cursor < ids.len() {
        let id = ids[cursor];
        cursor += 1;
        for rel in doc.node(id).relationships.values() {
            match rel {
                Rel::Null => {}
                Rel::One(target) => {
                    if seen.insert(*target) {
                        ids.push(*target);
                    }
                }
                Rel::Many(targets) => {
                    for target in targets {
                        if seen.insert(*target) {
                            ids.push(*target);
                        }
                    }
                }
            }
        }
    }
    ids
}

fn build_views(doc: &Document) -> Vec<View<'_>> {
    reachable_ids(doc)
        .into_iter()
        .map(|node| View {
            doc,
            node,
            peers: RefCell::new(Vec::new()),
        })
        .collect()
}

/// Wire relation links between views, after all views exist.
fn wire<'a>(doc: &'a Document, views: &'a [View<'a>]) {
    let index: HashMap<NodeId, usize> = views
        .iter()
        .enumerate()
        .map(|(i, view)| (view.node, i))
        .collect();

    for view in views {
        for (name, rel) in &doc.node(view.node).relationships {
            let peer = match rel {
                Rel::Null => continue,
                Rel::One(target) => Peer::One(&views[index[target]]),
                Rel::Many(targets) => {
                    Peer::Many(targets.iter().map(|t| &views[index[t]]).collect())
                }
            };
            view.peers.borrow_mut().push((name.clone(), peer));
        }
    }
}

fn view_for<'a>(views: &'a [View<'a>], node: NodeId) -> &'a View<'a> {
    views.iter().find(|view| view.node == node).unwrap()
}

#[test]
fn test_single_resource_round_trip() {
    let raw = json!({
        "data": {
            "type": "articles",
            "id": "1",
            "attributes": { "title": "Intro" },
            "relationships": {
                "author": { "data": { "type": "people", "id": "9" } },
                "comments": {
                    "data": [
                        { "type": "comments", "id": "5" },
                        { "type": "comments", "id": "12" }
                    ]
                }
            }
        },
        "included": [
            { "type": "people", "id": "9", "attributes": { "name": "Dan" } },
            { "type": "comments", "id": "5", "attributes": { "body": "first" } },
            { "type": "comments", "id": "12", "attributes": { "body": "second" } }
        ]
    });

    let doc = deserialize(&raw).unwrap();
    let views = build_views(&doc);
    wire(&doc, &views);

    let root = view_for(&views, doc.root().unwrap().node_id());
    assert_eq!(Renderer::new().render_resource(root), raw);
}

#[test]
fn test_collection_round_trip_with_shared_inclusion() {
    let raw = json!({
        "data": [
            {
                "type": "posts",
                "id": "1",
                "attributes": { "title": "a" },
                "relationships": {
                    "author": { "data": { "type": "people", "id": "9" } }
                }
            },
            {
                "type": "posts",
                "id": "2",
                "attributes": { "title": "b" },
                "relationships": {
                    "author": { "data": { "type": "people", "id": "9" } }
                }
            }
        ],
        "included": [
            { "type": "people", "id": "9", "attributes": { "name": "Dan" } }
        ],
        "meta": { "total": 2 }
    });

    let doc = deserialize(&raw).unwrap();
    let views = build_views(&doc);
    wire(&doc, &views);

    let roots: Vec<&dyn Resource> = doc
        .roots()
        .iter()
        .map(|p| view_for(&views, p.node_id()) as &dyn Resource)
        .collect();
    let collection = match doc.meta().cloned() {
        Some(meta) => Collection::with_metadata(roots, meta),
        None => Collection::new(roots),
    };

    assert_eq!(Renderer::new().render_collection(&collection), raw);
}

#[test]
fn test_cyclic_document_round_trip_terminates() {
    let raw = json!({
        "data": {
            "type": "users",
            "id": "1",
            "relationships": {
                "best_friend": { "data": { "type": "users", "id": "2" } }
            }
        },
        "included": [
            {
                "type": "users",
                "id": "2",
                "relationships": {
                    "best_friend": { "data": { "type": "users", "id": "1" } }
                }
            }
        ]
    });

    let doc = deserialize(&raw).unwrap();
    let views = build_views(&doc);
    wire(&doc, &views);

    let root = view_for(&views, doc.root().unwrap().node_id());
    assert_eq!(Renderer::new().render_resource(root), raw);
}
