//! Typed block instances handed to views.
//!
//! A block renders in one of four shapes: list or grid, each with or without a
//! typed settings element. The shapes are a closed set, so they are modelled
//! as plain enums rather than anything resolved at runtime.

use serde::Serialize;
use serde_json::{Map, Value};

use super::blocks::Udi;
use super::elements::PublishedElement;

/// Which block editor a preview is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockVariant {
    List,
    Grid,
}

impl BlockVariant {
    pub fn from_is_grid(is_grid: bool) -> Self {
        if is_grid { Self::Grid } else { Self::List }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BlockVariant::List => "list",
            BlockVariant::Grid => "grid",
        }
    }
}

/// The four instance shapes a block can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockShape {
    List,
    ListWithSettings,
    Grid,
    GridWithSettings,
}

impl BlockShape {
    pub fn select(variant: BlockVariant, has_settings: bool) -> Self {
        match (variant, has_settings) {
            (BlockVariant::List, false) => BlockShape::List,
            (BlockVariant::List, true) => BlockShape::ListWithSettings,
            (BlockVariant::Grid, false) => BlockShape::Grid,
            (BlockVariant::Grid, true) => BlockShape::GridWithSettings,
        }
    }

    pub fn variant(self) -> BlockVariant {
        match self {
            BlockShape::List | BlockShape::ListWithSettings => BlockVariant::List,
            BlockShape::Grid | BlockShape::GridWithSettings => BlockVariant::Grid,
        }
    }

    pub fn has_settings(self) -> bool {
        matches!(self, BlockShape::ListWithSettings | BlockShape::GridWithSettings)
    }
}

/// A generated model registered for a content-type alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelType {
    content_type_alias: String,
    name: String,
}

impl ModelType {
    pub fn new(content_type_alias: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            content_type_alias: content_type_alias.into(),
            name: name.into(),
        }
    }

    pub fn content_type_alias(&self) -> &str {
        &self.content_type_alias
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wraps a converted element as an instance of this model.
    pub fn bind(&self, element: PublishedElement) -> TypedElement {
        TypedElement {
            model: self.name.clone(),
            element,
        }
    }
}

/// A published element tagged with the model it was bound to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypedElement {
    pub model: String,
    #[serde(flatten)]
    pub element: PublishedElement,
}

/// Stand-in for absent settings; serializes as an element with no properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmptyElement {
    properties: Map<String, Value>,
}

/// Settings companion of a block. Never absent: templates can always
/// dereference it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SettingsSlot {
    Typed(TypedElement),
    Untyped(PublishedElement),
    Empty(EmptyElement),
}

impl SettingsSlot {
    pub fn empty() -> Self {
        SettingsSlot::Empty(EmptyElement::default())
    }

    pub fn is_typed(&self) -> bool {
        matches!(self, SettingsSlot::Typed(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SettingsSlot::Empty(_))
    }
}

/// Fields shared by list and grid items.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockItem {
    pub content_udi: Option<Udi>,
    pub content: TypedElement,
    pub settings_udi: Option<Udi>,
    pub settings: SettingsSlot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockGridItem {
    #[serde(flatten)]
    pub item: BlockItem,
    pub row_span: u32,
    pub column_span: u32,
    pub grid_columns: Option<u32>,
    pub area_grid_columns: Option<u32>,
    pub areas: Vec<BlockGridArea>,
}

impl BlockGridItem {
    pub fn new(item: BlockItem) -> Self {
        Self {
            item,
            row_span: 0,
            column_span: 0,
            grid_columns: None,
            area_grid_columns: None,
            areas: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockGridArea {
    pub alias: String,
    pub row_span: u32,
    pub column_span: u32,
    pub items: Vec<BlockGridAreaItem>,
}

/// Item placed in an area. Only identities are carried; nested blocks are not
/// converted or rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockGridAreaItem {
    pub content_udi: Option<Udi>,
    pub settings_udi: Option<Udi>,
}

/// Output-ready block handed to views as their model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedBlockInstance {
    List(BlockItem),
    Grid(BlockGridItem),
}

impl TypedBlockInstance {
    pub fn item(&self) -> &BlockItem {
        match self {
            TypedBlockInstance::List(item) => item,
            TypedBlockInstance::Grid(grid) => &grid.item,
        }
    }

    pub fn shape(&self) -> BlockShape {
        let has_settings = self.item().settings.is_typed();
        match self {
            TypedBlockInstance::List(_) => BlockShape::select(BlockVariant::List, has_settings),
            TypedBlockInstance::Grid(_) => BlockShape::select(BlockVariant::Grid, has_settings),
        }
    }

    pub fn as_grid(&self) -> Option<&BlockGridItem> {
        match self {
            TypedBlockInstance::Grid(grid) => Some(grid),
            TypedBlockInstance::List(_) => None,
        }
    }

    pub fn as_grid_mut(&mut self) -> Option<&mut BlockGridItem> {
        match self {
            TypedBlockInstance::Grid(grid) => Some(grid),
            TypedBlockInstance::List(_) => None,
        }
    }
}
