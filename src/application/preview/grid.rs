//! Merges block grid configuration with the raw layout of one grid block.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use crate::domain::blocks::GridLayoutItem;
use crate::domain::grid::{BlockGridAreaConfiguration, BlockGridConfiguration};
use crate::domain::instance::{BlockGridArea, BlockGridAreaItem, BlockGridItem};

/// Copies spans, column counts and areas onto `item`.
///
/// Only areas whose key is declared in the block's configuration are kept;
/// alias and spans come from that configuration. Area items carry identities
/// only. Missing configuration or layout yields zero spans and no areas.
pub fn reconcile(
    config: Option<&BlockGridConfiguration>,
    content_type_key: Uuid,
    item: &mut BlockGridItem,
    layout: Option<&GridLayoutItem>,
) {
    item.row_span = layout.and_then(|layout| layout.row_span).unwrap_or(0);
    item.column_span = layout.and_then(|layout| layout.column_span).unwrap_or(0);
    item.grid_columns = config.and_then(|config| config.grid_columns);

    let block_config = config.and_then(|config| config.block(content_type_key));
    if config.is_none() {
        debug!(%content_type_key, "no grid configuration; rendering without areas");
    } else if block_config.is_none() {
        debug!(
            %content_type_key,
            "no block configuration for content type; rendering without areas"
        );
    }

    let area_configs: HashMap<Uuid, &BlockGridAreaConfiguration> = block_config
        .map(|block| block.areas.iter().map(|area| (area.key, area)).collect())
        .unwrap_or_default();

    item.areas = layout
        .map(|layout| layout.areas.as_slice())
        .unwrap_or_default()
        .iter()
        .filter_map(|area| {
            let area_config = Uuid::parse_str(&area.key)
                .ok()
                .and_then(|key| area_configs.get(&key));
            let Some(area_config) = area_config else {
                debug!(area_key = %area.key, "dropping layout area missing from configuration");
                return None;
            };

            let items = area
                .items
                .iter()
                .map(|reference| BlockGridAreaItem {
                    content_udi: reference.content_udi.clone(),
                    settings_udi: reference.settings_udi.clone(),
                })
                .collect();

            Some(BlockGridArea {
                alias: area_config.alias.clone(),
                row_span: area_config.row_span,
                column_span: area_config.column_span,
                items,
            })
        })
        .collect();

    item.area_grid_columns = block_config.and_then(|block| block.area_grid_columns);
}
