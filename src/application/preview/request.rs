//! Inbound preview contract and dispatch to the list or grid policy.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use crate::application::error::PreviewError;
use crate::application::preview::context::RenderContext;
use crate::application::preview::service::BlockPreviewService;
use crate::domain::blocks::BlockValue;
use crate::domain::instance::BlockVariant;

/// Body of a preview request posted by the backoffice editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    #[serde(default)]
    pub block_editor_alias: Option<String>,
    #[serde(default)]
    pub culture: Option<String>,
    #[serde(default)]
    pub page_key: Option<Uuid>,
    /// Block value as a JSON document.
    pub request_body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewQuery {
    pub data_type_key: String,
    #[serde(default)]
    pub is_grid: bool,
    #[serde(default)]
    pub page_id: Option<i64>,
}

/// Entry point for preview rendering.
#[derive(Clone)]
pub struct BlockPreviewer {
    list: Arc<dyn BlockPreviewService>,
    grid: Arc<dyn BlockPreviewService>,
}

impl BlockPreviewer {
    pub fn new(list: Arc<dyn BlockPreviewService>, grid: Arc<dyn BlockPreviewService>) -> Self {
        Self { list, grid }
    }

    pub fn service(&self, variant: BlockVariant) -> &dyn BlockPreviewService {
        match variant {
            BlockVariant::List => self.list.as_ref(),
            BlockVariant::Grid => self.grid.as_ref(),
        }
    }

    /// Parses the request body and renders it with the policy picked by
    /// `query.is_grid`.
    pub async fn preview(
        &self,
        request: &PreviewRequest,
        query: &PreviewQuery,
        cancellation: CancellationToken,
    ) -> Result<String, PreviewError> {
        let block_value: BlockValue =
            serde_json::from_str(&request.request_body).map_err(PreviewError::InvalidPayload)?;

        let variant = BlockVariant::from_is_grid(query.is_grid);
        debug!(
            variant = variant.as_str(),
            block_editor_alias = request.block_editor_alias.as_deref(),
            "dispatching block preview"
        );

        let ctx = RenderContext::new()
            .with_page_id(query.page_id)
            .with_page_key(request.page_key)
            .with_cancellation(cancellation);

        self.service(variant)
            .get_markup_for_block(
                block_value,
                &query.data_type_key,
                &ctx,
                request.culture.as_deref(),
            )
            .await
    }
}
