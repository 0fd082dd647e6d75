//! The [`Resource`] trait: how the renderer reads an entity.

use serde_json::Value;

use crate::descriptor::{FieldDescriptor, RelationDescriptor};

/// A loaded relation value read off an entity instance.
pub enum Related<'a> {
    /// The relation was not eagerly loaded on this instance.
    None,
    One(&'a dyn Resource),
    Many(Vec<&'a dyn Resource>),
}

/// Entity metadata provider consumed by the renderer.
///
/// Implementations expose one entity instance: its wire type name, primary
/// key, per-type descriptors, and accessors for the values actually loaded
/// on the instance. The renderer only ever reads; it never mutates an
/// entity or loads anything on demand.
pub trait Resource {
    /// Wire type name, e.g. `"users"`.
    fn type_name(&self) -> &str;

    /// Primary key rendered as the resource `id`. Implementations with a
    /// non-`id` primary key stringify it here.
    fn id(&self) -> String;

    /// Ordered attribute descriptors for this entity type.
    fn fields(&self) -> Vec<FieldDescriptor>;

    /// Relation descriptors for this entity type.
    fn relations(&self) -> Vec<RelationDescriptor>;

    /// Read a named attribute. `None` when the attribute was never set on
    /// this instance; `Some(Value::Null)` when set and null.
    fn attribute(&self, name: &str) -> Option<Value>;

    /// Read a named relation value. `Related::None` when the relation was
    /// not eagerly loaded.
    fn related(&self, name: &str) -> Related<'_>;

    /// Names of the relations eagerly loaded on this instance.
    fn included(&self) -> Vec<String>;

    /// Stable identity used for cycle detection during graph walks. The
    /// default is the instance address, which holds for entities that
    /// outlive the render call; view types built on the fly must override
    /// this with a stable key.
    fn identity(&self) -> usize {
        (self as *const Self).cast::<()>() as usize
    }
}
