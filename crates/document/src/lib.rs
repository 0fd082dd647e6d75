//! prism-document: JSON:API wire document deserialization and projection.
//!
//! A JSON:API document flattens related resources into a single `included`
//! array and expresses relationships as `{type, id}` linkages, so resources
//! may reference each other in arbitrary order, including cyclically. This
//! crate parses such a document into a resource graph held in an index arena
//! ([`Document`]), using a two-phase build: every resource object is
//! converted into a node first, then a deferred-link queue wires the
//! relationship slots. Circular references resolve without recursion.
//!
//! The main entry point is [`deserialize`], which accepts JSON text, a
//! parsed `serde_json::Value`, or an already-built [`Document`] (returned
//! unchanged). Deserialized resources are read through [`Projection`]
//! views, which expose attributes and relationships uniformly and convert
//! back to wire fragments.

mod deserialize;
mod error;
mod projection;
mod types;

pub use deserialize::{deserialize, from_value, Input};
pub use error::DocumentError;
pub use projection::{Field, Projection};
pub use types::{Document, Linkage, NodeId, Rel, ResourceNode, Root};
