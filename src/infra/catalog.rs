//! Content-type and data-type catalog read from a TOML file.
//!
//! The catalog stands in for the host CMS: it maps content-type keys and
//! aliases to generated model names and holds block grid configuration per
//! data type. A converter on top of it turns raw block items into published
//! elements.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};
use uuid::Uuid;

use crate::application::ports::{
    ContentTypeBinding, ContentTypeStore, DataTypeConfigStore, ElementConverter,
    PropertyCacheLevel, StoreError,
};
use crate::application::preview::ModelRegistry;
use crate::application::preview::normalize::{NestedValue, try_parse_block_value};
use crate::domain::blocks::RawBlockItem;
use crate::domain::elements::{ContentTypeInfo, PublishedElement};
use crate::domain::grid::BlockGridConfiguration;
use crate::domain::instance::ModelType;

use super::error::InfraError;

#[derive(Debug, Clone, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    content_types: Vec<ContentTypeEntry>,
    #[serde(default)]
    data_types: Vec<DataTypeEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct ContentTypeEntry {
    key: Uuid,
    alias: String,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct DataTypeEntry {
    key: Uuid,
    #[serde(flatten)]
    grid: BlockGridConfiguration,
}

/// In-memory catalog implementing both host stores.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    content_types: Vec<ContentTypeBinding>,
    data_types: HashMap<Uuid, BlockGridConfiguration>,
}

impl CatalogStore {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, InfraError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await?;
        let store = Self::from_toml_str(&path.display().to_string(), &text)?;
        info!(
            path = %path.display(),
            content_types = store.content_types.len(),
            data_types = store.data_types.len(),
            "loaded catalog"
        );
        Ok(store)
    }

    /// Parses catalog TOML; `origin` only labels errors.
    pub fn from_toml_str(origin: &str, text: &str) -> Result<Self, InfraError> {
        let file: CatalogFile =
            toml::from_str(text).map_err(|err| InfraError::catalog(origin, err.to_string()))?;

        let mut data_types = HashMap::with_capacity(file.data_types.len());
        for entry in file.data_types {
            if data_types.insert(entry.key, entry.grid).is_some() {
                return Err(InfraError::catalog(
                    origin,
                    format!("data type `{}` is declared twice", entry.key),
                ));
            }
        }

        let content_types = file
            .content_types
            .into_iter()
            .map(|entry| ContentTypeBinding {
                key: entry.key,
                alias: entry.alias,
                model: entry.model.filter(|model| !model.trim().is_empty()),
            })
            .collect();

        Ok(Self {
            content_types,
            data_types,
        })
    }

    pub fn with_content_type(mut self, binding: ContentTypeBinding) -> Self {
        self.content_types.push(binding);
        self
    }

    pub fn with_data_type(mut self, key: Uuid, config: BlockGridConfiguration) -> Self {
        self.data_types.insert(key, config);
        self
    }

    pub fn content_types(&self) -> &[ContentTypeBinding] {
        &self.content_types
    }

    pub fn binding(&self, alias: &str) -> Option<&ContentTypeBinding> {
        self.content_types.iter().find(|binding| binding.alias == alias)
    }

    pub fn binding_by_key(&self, key: Uuid) -> Option<&ContentTypeBinding> {
        self.content_types.iter().find(|binding| binding.key == key)
    }

    /// Models for every content type that names one, in catalog order.
    pub fn model_registry(&self) -> ModelRegistry {
        self.content_types
            .iter()
            .filter_map(|binding| {
                let model = binding.model.as_deref()?;
                Some(ModelType::new(binding.alias.clone(), model))
            })
            .collect()
    }
}

#[async_trait]
impl ContentTypeStore for CatalogStore {
    async fn get_binding(&self, alias: &str) -> Result<Option<ContentTypeBinding>, StoreError> {
        Ok(self.binding(alias).cloned())
    }

    async fn get_binding_by_key(
        &self,
        key: Uuid,
    ) -> Result<Option<ContentTypeBinding>, StoreError> {
        Ok(self.binding_by_key(key).cloned())
    }
}

#[async_trait]
impl DataTypeConfigStore for CatalogStore {
    async fn get_grid_config(
        &self,
        data_type_key: Uuid,
    ) -> Result<Option<BlockGridConfiguration>, StoreError> {
        Ok(self.data_types.get(&data_type_key).cloned())
    }
}

/// Converts raw block items against a content-type store.
///
/// Nested block values, which arrive as JSON strings after normalization,
/// are parsed back into JSON so templates can walk them.
pub struct CatalogElementConverter {
    content_types: Arc<dyn ContentTypeStore>,
}

impl CatalogElementConverter {
    pub fn new(content_types: Arc<dyn ContentTypeStore>) -> Self {
        Self { content_types }
    }

    async fn binding_for(
        &self,
        item: &RawBlockItem,
    ) -> Result<Option<ContentTypeBinding>, StoreError> {
        if let Some(key) = item.content_type_key
            && let Some(binding) = self.content_types.get_binding_by_key(key).await?
        {
            return Ok(Some(binding));
        }

        match item.content_type_alias.as_deref() {
            Some(alias) if !alias.is_empty() => self.content_types.get_binding(alias).await,
            _ => Ok(None),
        }
    }
}

fn expand_property(value: &Value) -> Value {
    if let Value::String(text) = value
        && let NestedValue::Block(_) = try_parse_block_value(value)
        && let Ok(parsed) = serde_json::from_str::<Value>(text)
    {
        return parsed;
    }
    value.clone()
}

#[async_trait]
impl ElementConverter for CatalogElementConverter {
    async fn convert_to_element(
        &self,
        item: &RawBlockItem,
        cache_level: PropertyCacheLevel,
        throw_on_error: bool,
    ) -> Result<Option<PublishedElement>, StoreError> {
        let Some(binding) = self.binding_for(item).await? else {
            debug!(
                content_type = %item.content_type_label(),
                strict = throw_on_error,
                "content type not in catalog"
            );
            return Ok(None);
        };

        let properties: Map<String, Value> = item
            .raw_property_values
            .iter()
            .map(|(alias, value)| (alias.clone(), expand_property(value)))
            .collect();

        debug!(
            alias = %binding.alias,
            properties = properties.len(),
            ?cache_level,
            "converted block item"
        );

        Ok(Some(PublishedElement::new(
            ContentTypeInfo {
                key: binding.key,
                alias: binding.alias,
            },
            properties,
        )))
    }
}
