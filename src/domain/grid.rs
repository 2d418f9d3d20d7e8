//! Block grid data-type configuration.
//!
//! Field names follow the editor's camelCase; the snake_case spellings used
//! by the TOML catalog are accepted as aliases.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

const DEFAULT_AREA_ROW_SPAN: u32 = 1;
const DEFAULT_AREA_COLUMN_SPAN: u32 = 12;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockGridConfiguration {
    #[serde(default, alias = "grid_columns")]
    pub grid_columns: Option<u32>,
    #[serde(default)]
    pub blocks: Vec<BlockGridBlockConfiguration>,
}

impl BlockGridConfiguration {
    /// Block configuration registered for the given content element type.
    pub fn block(&self, content_element_type_key: Uuid) -> Option<&BlockGridBlockConfiguration> {
        self.blocks
            .iter()
            .find(|block| block.content_element_type_key == content_element_type_key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockGridBlockConfiguration {
    #[serde(alias = "content_element_type_key")]
    pub content_element_type_key: Uuid,
    #[serde(default, alias = "area_grid_columns")]
    pub area_grid_columns: Option<u32>,
    #[serde(default)]
    pub areas: Vec<BlockGridAreaConfiguration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockGridAreaConfiguration {
    pub key: Uuid,
    pub alias: String,
    #[serde(default = "default_area_row_span", alias = "row_span")]
    pub row_span: u32,
    #[serde(default = "default_area_column_span", alias = "column_span")]
    pub column_span: u32,
}

fn default_area_row_span() -> u32 {
    DEFAULT_AREA_ROW_SPAN
}

fn default_area_column_span() -> u32 {
    DEFAULT_AREA_COLUMN_SPAN
}
