//! Flattens nested block values into strings so they survive the trip from
//! the editor to the element converter.

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::blocks::{BlockValue, RawBlockItem};

pub const DEFAULT_MAX_NESTING_DEPTH: usize = 32;

/// Result of probing a raw property value for a nested block value.
#[derive(Debug)]
pub enum NestedValue {
    Block(Box<BlockValue>),
    Plain,
}

/// Probes `value` for a nested block value, either inline JSON or a JSON string.
pub fn try_parse_block_value(value: &Value) -> NestedValue {
    let parsed = match value {
        Value::Object(map) if map.contains_key("contentData") => {
            serde_json::from_value::<BlockValue>(value.clone()).ok()
        }
        Value::String(text) if text.trim_start().starts_with('{') => {
            match serde_json::from_str::<Value>(text) {
                Ok(inner @ Value::Object(_)) => return try_parse_block_value(&inner),
                _ => None,
            }
        }
        _ => None,
    };

    match parsed {
        Some(block) => NestedValue::Block(Box::new(block)),
        None => NestedValue::Plain,
    }
}

/// Rewrites raw property values in place.
///
/// Nested block values are normalized recursively and stored back as their
/// serialized JSON; every other non-null value becomes its string form.
/// Recursion stops at `max_depth`; deeper values are stored as plain strings.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    max_depth: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NESTING_DEPTH)
    }
}

impl Normalizer {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn normalize(&self, item: &mut RawBlockItem) {
        self.normalize_at(item, 0);
    }

    fn normalize_at(&self, item: &mut RawBlockItem, depth: usize) {
        for (alias, value) in item.raw_property_values.iter_mut() {
            if value.is_null() {
                continue;
            }

            if depth >= self.max_depth {
                warn!(
                    property = %alias,
                    max_depth = self.max_depth,
                    "nested block depth limit reached; keeping value unexpanded"
                );
            } else if let NestedValue::Block(mut nested) = try_parse_block_value(value) {
                for child in nested
                    .content_data
                    .iter_mut()
                    .chain(nested.settings_data.iter_mut())
                {
                    self.normalize_at(child, depth + 1);
                }

                match serde_json::to_string(&nested) {
                    Ok(serialized) => {
                        debug!(property = %alias, depth, "normalized nested block value");
                        *value = Value::String(serialized);
                        continue;
                    }
                    Err(err) => {
                        warn!(property = %alias, error = %err, "failed to serialize nested block value");
                    }
                }
            }

            *value = Value::String(stringify(value));
        }
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn item(properties: Value) -> RawBlockItem {
        serde_json::from_value(json!({
            "udi": "umb://element/1",
            "contentTypeKey": "7b3e1f4c-5a43-4d2b-9d36-2f3b8e0f7a11",
        }))
        .map(|mut item: RawBlockItem| {
            if let Value::Object(map) = properties {
                item.raw_property_values = map;
            }
            item
        })
        .expect("valid item")
    }

    fn nested_block() -> Value {
        json!({
            "layout": {"Umbraco.BlockList": [{"contentUdi": "umb://element/2"}]},
            "contentData": [{
                "udi": "umb://element/2",
                "contentTypeKey": "0f1d2c3b-4a59-4867-8c7d-6e5f4a3b2c1d",
                "count": 3,
                "visible": true
            }],
            "settingsData": []
        })
    }

    #[test]
    fn scalars_become_strings_and_nulls_stay() {
        let mut raw = item(json!({"title": "Hello", "count": 42, "flag": false, "empty": null}));
        Normalizer::default().normalize(&mut raw);

        let values = &raw.raw_property_values;
        assert_eq!(values["title"], json!("Hello"));
        assert_eq!(values["count"], json!("42"));
        assert_eq!(values["flag"], json!("false"));
        assert_eq!(values["empty"], Value::Null);
    }

    #[test]
    fn nested_block_values_are_normalized_and_serialized() {
        let mut raw = item(json!({"items": nested_block()}));
        Normalizer::default().normalize(&mut raw);

        let Value::String(serialized) = &raw.raw_property_values["items"] else {
            panic!("nested block should be stored as a string");
        };
        let nested: BlockValue = serde_json::from_str(serialized).expect("round trips");
        let child = &nested.content_data[0].raw_property_values;
        assert_eq!(child["count"], json!("3"));
        assert_eq!(child["visible"], json!("true"));
    }

    #[test]
    fn nested_block_values_inside_strings_are_detected() {
        let text = serde_json::to_string(&nested_block()).expect("serializable");
        let mut raw = item(json!({ "items": text }));
        Normalizer::default().normalize(&mut raw);

        let Value::String(serialized) = &raw.raw_property_values["items"] else {
            panic!("nested block should be stored as a string");
        };
        assert!(serialized.contains("\"count\":\"3\""));
    }

    #[test]
    fn normalizing_twice_changes_nothing() {
        let mut raw = item(json!({
            "title": "Hello",
            "count": 7,
            "items": nested_block(),
            "missing": null
        }));
        let normalizer = Normalizer::default();
        normalizer.normalize(&mut raw);
        let once = raw.clone();
        normalizer.normalize(&mut raw);

        assert_eq!(raw, once);
    }

    #[test]
    fn depth_guard_stops_recursion() {
        let mut raw = item(json!({"items": nested_block()}));
        Normalizer::new(0).normalize(&mut raw);

        let Value::String(serialized) = &raw.raw_property_values["items"] else {
            panic!("value should be stringified");
        };
        // Children were left untouched, so the number is still a JSON number.
        assert!(serialized.contains("\"count\":3"));
    }

    #[test]
    fn json_strings_without_content_data_are_plain() {
        let value = json!("{\"not\": \"a block\"}");
        assert!(matches!(try_parse_block_value(&value), NestedValue::Plain));
        assert!(matches!(
            try_parse_block_value(&json!({"contentData": []})),
            NestedValue::Block(_)
        ));
    }
}
