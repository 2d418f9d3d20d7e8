//! Traits describing the host collaborators the preview pipeline talks to.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::application::preview::ViewData;
use crate::domain::blocks::RawBlockItem;
use crate::domain::elements::PublishedElement;
use crate::domain::grid::BlockGridConfiguration;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("malformed store record: {message}")]
    Malformed { message: String },
}

impl StoreError {
    pub fn unavailable(err: impl std::fmt::Display) -> Self {
        Self::Unavailable(err.to_string())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("template `{path}` failed to render: {message}")]
    Template { path: String, message: String },
    #[error("view component `{name}` failed: {message}")]
    Component { name: String, message: String },
}

impl ViewError {
    pub fn template(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Template {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn component(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Component {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// A content type known to the host, with the model generated for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTypeBinding {
    pub key: Uuid,
    pub alias: String,
    pub model: Option<String>,
}

#[async_trait]
pub trait ContentTypeStore: Send + Sync {
    async fn get_binding(&self, alias: &str) -> Result<Option<ContentTypeBinding>, StoreError>;

    async fn get_binding_by_key(
        &self,
        key: Uuid,
    ) -> Result<Option<ContentTypeBinding>, StoreError>;
}

#[async_trait]
pub trait DataTypeConfigStore: Send + Sync {
    async fn get_grid_config(
        &self,
        data_type_key: Uuid,
    ) -> Result<Option<BlockGridConfiguration>, StoreError>;
}

/// How long converted property values may be cached by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropertyCacheLevel {
    /// Previews convert transient data, so nothing is cached.
    #[default]
    None,
    Element,
    Elements,
    Snapshot,
}

#[async_trait]
pub trait ElementConverter: Send + Sync {
    /// Converts raw block data into a published element. `Ok(None)` means the
    /// content type could not be resolved.
    async fn convert_to_element(
        &self,
        item: &RawBlockItem,
        cache_level: PropertyCacheLevel,
        throw_on_error: bool,
    ) -> Result<Option<PublishedElement>, StoreError>;
}

/// A template the view engine resolved for a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewHandle {
    path: String,
}

impl ViewHandle {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[async_trait]
pub trait ViewEngine: Send + Sync {
    async fn resolve_view(&self, path: &str) -> Option<ViewHandle>;

    /// Renders into a fresh buffer owned by this call.
    async fn render(&self, view: &ViewHandle, view_data: &ViewData) -> Result<String, ViewError>;
}

/// Code-driven view for a content type.
pub trait ViewComponent: Send + Sync {
    fn name(&self) -> &str;

    fn invoke(&self, view_data: &ViewData) -> Result<String, ViewError>;
}

pub trait ViewComponentRegistry: Send + Sync {
    fn select_component(&self, alias: &str) -> Option<Arc<dyn ViewComponent>>;
}
