use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Content type an element was converted against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentTypeInfo {
    pub key: Uuid,
    pub alias: String,
}

/// Property-accessible view of a converted block item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedElement {
    pub content_type: ContentTypeInfo,
    pub properties: Map<String, Value>,
}

impl PublishedElement {
    pub fn new(content_type: ContentTypeInfo, properties: Map<String, Value>) -> Self {
        Self {
            content_type,
            properties,
        }
    }

    pub fn alias(&self) -> &str {
        &self.content_type.alias
    }

    pub fn value(&self, alias: &str) -> Option<&Value> {
        self.properties.get(alias)
    }
}
