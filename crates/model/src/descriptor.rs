//! Field and relation descriptors: the per-type metadata the renderer
//! needs to decide what is serialized and how relations are linked.

use serde::{Deserialize, Serialize};

/// Whether an attribute is serialized by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Serialized unless excluded by a sparse fieldset.
    Default,
    /// Serialized only when the named tag is enabled on the renderer.
    Tagged(String),
    /// Never serialized.
    Hidden,
}

/// Metadata for one attribute of an entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub visibility: Visibility,
    /// Free-form schema metadata carried through for documentation tooling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl FieldDescriptor {
    pub fn visible(name: impl Into<String>) -> Self {
        FieldDescriptor {
            name: name.into(),
            visibility: Visibility::Default,
            meta: None,
        }
    }

    pub fn hidden(name: impl Into<String>) -> Self {
        FieldDescriptor {
            name: name.into(),
            visibility: Visibility::Hidden,
            meta: None,
        }
    }

    pub fn tagged(name: impl Into<String>, tag: impl Into<String>) -> Self {
        FieldDescriptor {
            name: name.into(),
            visibility: Visibility::Tagged(tag.into()),
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: serde_json::Value) -> Self {
        self.meta = Some(meta);
        self
    }
}

/// Relation arity and ownership kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    ToOne,
    ToMany,
    /// To-one relation owned through a local foreign-key attribute; the
    /// renderer can synthesize a linkage for it without loading the target.
    BelongsTo,
}

/// Metadata for one named relation of an entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationDescriptor {
    pub name: String,
    pub kind: RelationKind,
    /// Wire type name of the related resource.
    pub related_type: String,
    /// Local attribute holding the related id (belongs-to relations).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,
}

impl RelationDescriptor {
    pub fn to_one(name: impl Into<String>, related_type: impl Into<String>) -> Self {
        RelationDescriptor {
            name: name.into(),
            kind: RelationKind::ToOne,
            related_type: related_type.into(),
            foreign_key: None,
        }
    }

    pub fn to_many(name: impl Into<String>, related_type: impl Into<String>) -> Self {
        RelationDescriptor {
            name: name.into(),
            kind: RelationKind::ToMany,
            related_type: related_type.into(),
            foreign_key: None,
        }
    }

    pub fn belongs_to(
        name: impl Into<String>,
        related_type: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        RelationDescriptor {
            name: name.into(),
            kind: RelationKind::BelongsTo,
            related_type: related_type.into(),
            foreign_key: Some(foreign_key.into()),
        }
    }
}
