//! JSON:API document rendering: records, collections, errors.

use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashSet};

use prism_model::{
    ApiError, Collection, FieldError, Related, RelationKind, RenderContext, Resource, Visibility,
};

use crate::include::{gather_included, gather_union};

/// Media type of every rendered document.
pub const CONTENT_TYPE: &str = "application/vnd.api+json";

/// Value kinds the renderer accepts.
pub enum Renderable<'a> {
    One(&'a dyn Resource),
    Many(Collection<'a>),
    Error(&'a ApiError),
    /// Pass-through payload rendered as `{data: value}` verbatim.
    Custom(&'a Value),
}

impl<'a> From<&'a dyn Resource> for Renderable<'a> {
    fn from(resource: &'a dyn Resource) -> Self {
        Renderable::One(resource)
    }
}

impl<'a> From<Collection<'a>> for Renderable<'a> {
    fn from(collection: Collection<'a>) -> Self {
        Renderable::Many(collection)
    }
}

impl<'a> From<&'a ApiError> for Renderable<'a> {
    fn from(error: &'a ApiError) -> Self {
        Renderable::Error(error)
    }
}

impl<'a> From<&'a Value> for Renderable<'a> {
    fn from(value: &'a Value) -> Self {
        Renderable::Custom(value)
    }
}

/// JSON:API renderer.
///
/// Holds per-request presentation state only; the entity graph is never
/// mutated. One renderer per request: `tags` and `fields` come from request
/// parameters, `debug` from host configuration.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    /// Enabled visibility tags: `Tagged` fields render only when their tag
    /// is listed here.
    pub tags: Vec<String>,
    /// Sparse fieldsets: per-type attribute allow-lists
    /// (`fields[users]=name,age` on the request side).
    pub fields: BTreeMap<String, Vec<String>>,
    /// Pretty-print the output document.
    pub pretty: bool,
    /// Attach `meta.backtrace` to error documents.
    pub debug: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer::default()
    }

    /// Render a value into a JSON:API document string.
    ///
    /// Always sets the outbound content type (unless the caller already
    /// picked one); rendering an error value also sets the response status.
    /// This never fails: unrecognized errors fall back to the 500 shape and
    /// a well-formed entity graph always renders.
    pub fn render(&self, value: Renderable<'_>, ctx: &mut dyn RenderContext) -> String {
        ctx.set_content_type_if_unset(CONTENT_TYPE);

        let doc = match value {
            Renderable::One(resource) => self.render_resource(resource),
            Renderable::Many(collection) => self.render_collection(&collection),
            Renderable::Error(error) => {
                ctx.set_status(error.status());
                self.render_error(error)
            }
            Renderable::Custom(value) => json!({ "data": value }),
        };

        self.encode(&doc)
    }

    /// Render a single entity with its transitive inclusions.
    pub fn render_resource(&self, resource: &dyn Resource) -> Value {
        let mut out = Map::new();
        out.insert("data".to_owned(), self.render_record(resource, false));

        let included = gather_included(resource);
        if !included.is_empty() {
            out.insert(
                "included".to_owned(),
                Value::Array(
                    included
                        .iter()
                        .map(|entity| self.render_record(*entity, false))
                        .collect(),
                ),
            );
        }

        Value::Object(out)
    }

    /// Render a homogeneous collection. Inclusions are unioned across
    /// members, so a resource related to two members appears exactly once.
    pub fn render_collection(&self, collection: &Collection<'_>) -> Value {
        let items = collection.items();
        let mut out = Map::new();

        out.insert(
            "data".to_owned(),
            Value::Array(
                items
                    .iter()
                    .map(|entity| self.render_record(*entity, false))
                    .collect(),
            ),
        );

        if !items.is_empty() {
            let included = gather_union(items.iter().copied());
            if !included.is_empty() {
                out.insert(
                    "included".to_owned(),
                    Value::Array(
                        included
                            .iter()
                            .map(|entity| self.render_record(*entity, false))
                            .collect(),
                    ),
                );
            }
        }

        if let Some(metadata) = collection.metadata() {
            out.insert("meta".to_owned(), Value::Object(metadata.clone()));
        }

        Value::Object(out)
    }

    /// Render one resource object. Link-only rendering emits just the
    /// `{type, id}` identifier; otherwise attributes and relationships are
    /// added, each omitted entirely when empty.
    fn render_record(&self, resource: &dyn Resource, link_only: bool) -> Value {
        let mut out = Map::new();
        out.insert(
            "type".to_owned(),
            Value::String(resource.type_name().to_owned()),
        );
        out.insert("id".to_owned(), Value::String(resource.id()));

        if !link_only {
            let attributes = self.render_attributes(resource);
            if !attributes.is_empty() {
                out.insert("attributes".to_owned(), Value::Object(attributes));
            }
            let relationships = self.render_relationships(resource);
            if !relationships.is_empty() {
                out.insert("relationships".to_owned(), Value::Object(relationships));
            }
        }

        Value::Object(out)
    }

    /// Visibility and sparse-fieldset filters compose by intersection.
    fn render_attributes(&self, resource: &dyn Resource) -> Map<String, Value> {
        let sparse = self.fields.get(resource.type_name());
        let mut out = Map::new();

        for field in resource.fields() {
            if field.name == "id" || field.name == "type" {
                continue;
            }
            let visible = match &field.visibility {
                Visibility::Default => true,
                Visibility::Tagged(tag) => self.tags.iter().any(|t| t == tag),
                Visibility::Hidden => false,
            };
            if !visible {
                continue;
            }
            if let Some(allowed) = sparse {
                if !allowed.iter().any(|name| name == &field.name) {
                    continue;
                }
            }
            if let Some(value) = resource.attribute(&field.name) {
                out.insert(field.name, value);
            }
        }

        out
    }

    fn render_relationships(&self, resource: &dyn Resource) -> Map<String, Value> {
        let included: HashSet<String> = resource.included().into_iter().collect();
        let mut out = Map::new();

        for relation in resource.relations() {
            if included.contains(&relation.name) {
                match resource.related(&relation.name) {
                    Related::One(target) => {
                        out.insert(
                            relation.name.clone(),
                            json!({ "data": self.render_record(target, true) }),
                        );
                        continue;
                    }
                    Related::Many(targets) => {
                        let data: Vec<Value> = targets
                            .iter()
                            .map(|target| self.render_record(*target, true))
                            .collect();
                        out.insert(relation.name.clone(), json!({ "data": data }));
                        continue;
                    }
                    // Declared as included but not actually loaded; fall
                    // through to linkage synthesis.
                    Related::None => {}
                }
            }

            // Belongs-to linkage from the foreign key: present even when the
            // relation was not eagerly loaded, so linkage information never
            // depends on fetching the target.
            if relation.kind == RelationKind::BelongsTo {
                if let Some(foreign_key) = &relation.foreign_key {
                    if let Some(id) = resource.attribute(foreign_key).as_ref().and_then(scalar_id)
                    {
                        out.insert(
                            relation.name.clone(),
                            json!({ "data": { "type": relation.related_type, "id": id } }),
                        );
                    }
                }
            }
        }

        out
    }

    /// Render an error value into the error-document shape together with
    /// the HTTP status it implies. Statuses are wire-encoded as strings.
    fn render_error(&self, error: &ApiError) -> Value {
        let entries: Vec<Value> = match error {
            ApiError::Validation(fields) => fields
                .iter()
                .map(|FieldError { field, message }| {
                    json!({
                        "status": "422",
                        "detail": message,
                        "source": { "pointer": format!("/{}", field.replace('.', "/")) }
                    })
                })
                .collect(),
            ApiError::Domain {
                status,
                title,
                detail,
            } => vec![json!({
                "status": status.to_string(),
                "title": title,
                "detail": detail
            })],
            ApiError::Unclassified { title, detail, .. } => vec![json!({
                "status": "500",
                "title": title,
                "detail": detail
            })],
        };

        let mut out = Map::new();
        out.insert("errors".to_owned(), Value::Array(entries));

        if self.debug {
            if let Some(backtrace) = error.backtrace() {
                let lines: Vec<Value> = backtrace
                    .lines()
                    .map(|line| Value::String(line.trim().to_owned()))
                    .collect();
                out.insert("meta".to_owned(), json!({ "backtrace": lines }));
            }
        }

        Value::Object(out)
    }

    fn encode(&self, doc: &Value) -> String {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(doc)
        } else {
            serde_json::to_string(doc)
        };
        encoded.unwrap_or_default()
    }
}

fn scalar_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
