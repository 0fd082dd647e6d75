use serde_json::{Map, Value};

use crate::resource::Resource;

/// An iterable of entities plus optional render-time metadata (for example
/// a total count), emitted under the document `meta` key.
pub struct Collection<'a> {
    items: Vec<&'a dyn Resource>,
    metadata: Option<Map<String, Value>>,
}

impl<'a> Collection<'a> {
    pub fn new(items: Vec<&'a dyn Resource>) -> Self {
        Collection {
            items,
            metadata: None,
        }
    }

    pub fn with_metadata(items: Vec<&'a dyn Resource>, metadata: Map<String, Value>) -> Self {
        Collection {
            items,
            metadata: Some(metadata),
        }
    }

    pub fn items(&self) -> &[&'a dyn Resource] {
        &self.items
    }

    pub fn metadata(&self) -> Option<&Map<String, Value>> {
        self.metadata.as_ref()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
