//! prism-render: entity graph to JSON:API wire document.
//!
//! [`Renderer`] turns a root entity (or a homogeneous collection) plus its
//! transitively reachable relations into one flat document: the root under
//! `data`, every distinct related entity under `included`, relationships as
//! `{type, id}` linkages. Sparse fieldsets and visibility tags restrict
//! attributes without touching the underlying entities, and classified
//! error values render into the JSON:API error-document shape.
//!
//! The inclusion walk ([`gather_included`]) visits each entity at most
//! once, keyed on entity identity, so cyclic graphs terminate and a
//! resource reachable through several relations appears exactly once.

mod include;
mod renderer;

pub use include::{gather_included, gather_union};
pub use renderer::{Renderable, Renderer, CONTENT_TYPE};
