//! Raw block payloads exactly as the backoffice editor posts them.
//!
//! Everything here is transient: values are deserialized from a preview
//! request, normalized in place, converted and then dropped when the render
//! call returns.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Opaque identity of a content or settings item (`umb://element/<key>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Udi(String);

impl Udi {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Builds the element identity used by block editors for `key`.
    pub fn element(key: Uuid) -> Self {
        Self(format!("umb://element/{}", key.simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Udi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One content or settings item of a block value.
///
/// Property values are kept in editor order. After normalization every
/// non-null value is a JSON string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlockItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udi: Option<Udi>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type_key: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type_alias: Option<String>,
    #[serde(flatten)]
    pub raw_property_values: Map<String, Value>,
}

impl RawBlockItem {
    /// Best available name for the item's content type, used in diagnostics.
    pub fn content_type_label(&self) -> String {
        match (&self.content_type_alias, self.content_type_key) {
            (Some(alias), _) if !alias.is_empty() => alias.clone(),
            (_, Some(key)) => key.to_string(),
            _ => "<unknown>".to_string(),
        }
    }
}

/// A block editor value: content items, settings items and the layout.
///
/// The layout stays untyped here because its shape depends on the editor
/// (a plain sequence for lists, a span/area record for grids).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockValue {
    #[serde(default)]
    pub layout: Value,
    #[serde(default, deserialize_with = "items_skipping_nulls")]
    pub content_data: Vec<RawBlockItem>,
    #[serde(default, deserialize_with = "items_skipping_nulls")]
    pub settings_data: Vec<RawBlockItem>,
}

impl BlockValue {
    pub fn first_content(&self) -> Option<&RawBlockItem> {
        self.content_data.first()
    }

    pub fn first_settings(&self) -> Option<&RawBlockItem> {
        self.settings_data.first()
    }
}

// Editors post `[null]` when a block has no settings.
fn items_skipping_nulls<'de, D>(deserializer: D) -> Result<Vec<RawBlockItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Option<Vec<Option<RawBlockItem>>> = Option::deserialize(deserializer)?;
    Ok(items.unwrap_or_default().into_iter().flatten().collect())
}

/// Layout entry of a single grid block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLayoutItem {
    #[serde(default)]
    pub content_udi: Option<Udi>,
    #[serde(default)]
    pub settings_udi: Option<Udi>,
    #[serde(default)]
    pub row_span: Option<u32>,
    #[serde(default)]
    pub column_span: Option<u32>,
    #[serde(default)]
    pub areas: Vec<GridLayoutArea>,
}

impl GridLayoutItem {
    /// Extracts the grid layout entry from a block value layout.
    ///
    /// Accepts a bare layout item, a sequence of items, or items keyed by
    /// editor alias (`{"Umbraco.BlockGrid": [...]}`). The first item wins.
    pub fn from_layout(layout: &Value) -> Option<Self> {
        match layout {
            Value::Object(map) if looks_like_layout_item(map) => {
                serde_json::from_value(layout.clone()).ok()
            }
            Value::Object(map) => map.values().find_map(Self::from_layout),
            Value::Array(items) => items.first().and_then(Self::from_layout),
            _ => None,
        }
    }
}

fn looks_like_layout_item(map: &Map<String, Value>) -> bool {
    ["contentUdi", "rowSpan", "columnSpan", "areas"]
        .iter()
        .any(|key| map.contains_key(*key))
}

/// An area inside a grid layout entry, referencing nested items by identity.
///
/// The key is kept as posted; areas whose key does not name a configured
/// area are dropped during reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLayoutArea {
    pub key: String,
    #[serde(default)]
    pub items: Vec<GridAreaItemRef>,
}

/// Identity-only reference to an item placed in an area.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridAreaItemRef {
    #[serde(default)]
    pub content_udi: Option<Udi>,
    #[serde(default)]
    pub settings_udi: Option<Udi>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn block_value_skips_null_settings() {
        let value: BlockValue = serde_json::from_value(json!({
            "layout": {},
            "contentData": [{"contentTypeKey": "7b3e1f4c-5a43-4d2b-9d36-2f3b8e0f7a11", "title": "Hi"}],
            "settingsData": [null]
        }))
        .expect("valid block value");

        assert_eq!(value.content_data.len(), 1);
        assert!(value.settings_data.is_empty());
        assert_eq!(
            value.content_data[0].raw_property_values.get("title"),
            Some(&json!("Hi"))
        );
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let value: BlockValue = serde_json::from_str("{}").expect("empty object parses");
        assert!(value.first_content().is_none());
        assert!(value.first_settings().is_none());
        assert!(value.layout.is_null());
    }

    #[test]
    fn grid_layout_accepts_editor_keyed_sequences() {
        let layout = json!({
            "Umbraco.BlockGrid": [{
                "contentUdi": "umb://element/abc",
                "rowSpan": 2,
                "columnSpan": 6,
                "areas": []
            }]
        });

        let item = GridLayoutItem::from_layout(&layout).expect("layout item");
        assert_eq!(item.row_span, Some(2));
        assert_eq!(item.column_span, Some(6));
        assert_eq!(item.content_udi, Some(Udi::new("umb://element/abc")));
    }

    #[test]
    fn grid_layout_keeps_spans_when_an_area_key_is_not_a_uuid() {
        let layout = json!({
            "rowSpan": 2,
            "columnSpan": 6,
            "areas": [
                {"key": "main", "items": []},
                {"key": "7b3e1f4c-5a43-4d2b-9d36-2f3b8e0f7a11", "items": []}
            ]
        });

        let item = GridLayoutItem::from_layout(&layout).expect("layout item");
        assert_eq!(item.row_span, Some(2));
        assert_eq!(item.column_span, Some(6));
        let keys: Vec<_> = item.areas.iter().map(|area| area.key.as_str()).collect();
        assert_eq!(keys, ["main", "7b3e1f4c-5a43-4d2b-9d36-2f3b8e0f7a11"]);
    }

    #[test]
    fn grid_layout_accepts_bare_item() {
        let layout = json!({"columnSpan": 4});
        let item = GridLayoutItem::from_layout(&layout).expect("layout item");
        assert_eq!(item.column_span, Some(4));
        assert_eq!(item.row_span, None);
    }

    #[test]
    fn grid_layout_absent_for_scalars() {
        assert!(GridLayoutItem::from_layout(&Value::Null).is_none());
        assert!(GridLayoutItem::from_layout(&json!("layout")).is_none());
    }

    #[test]
    fn content_type_label_prefers_alias() {
        let key = Uuid::nil();
        let mut item = RawBlockItem {
            content_type_key: Some(key),
            ..Default::default()
        };
        assert_eq!(item.content_type_label(), key.to_string());

        item.content_type_alias = Some("hero".to_string());
        assert_eq!(item.content_type_label(), "hero");
    }

    #[test]
    fn element_udi_uses_simple_key() {
        let key = Uuid::parse_str("7b3e1f4c-5a43-4d2b-9d36-2f3b8e0f7a11").expect("uuid");
        assert_eq!(
            Udi::element(key).as_str(),
            "umb://element/7b3e1f4c5a434d2b9d362f3b8e0f7a11"
        );
    }
}
