//! prism-model: the entity metadata contract consumed by the renderer.
//!
//! The rendering core never sees concrete application types. Instead, a
//! host exposes each entity through the [`Resource`] trait: a wire type
//! name, attribute and relation descriptors, and accessors for loaded
//! values. Collections travel with optional metadata ([`Collection`]),
//! outbound side effects go through [`RenderContext`], and failures are
//! classified into the [`ApiError`] taxonomy before rendering.

mod collection;
mod context;
mod descriptor;
mod error;
mod resource;

pub use collection::Collection;
pub use context::{RenderContext, ResponseParts};
pub use descriptor::{FieldDescriptor, RelationDescriptor, RelationKind, Visibility};
pub use error::{ApiError, FieldError};
pub use resource::{Related, Resource};
