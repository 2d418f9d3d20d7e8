//! Preview orchestration: the shared pipeline plus the list and grid policies.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use metrics::{counter, histogram};
use tracing::{Instrument, Span, debug, field, info_span, warn};
use uuid::Uuid;

use crate::application::error::PreviewError;
use crate::application::ports::{DataTypeConfigStore, ElementConverter};
use crate::application::preview::builder::build_instance;
use crate::application::preview::context::RenderContext;
use crate::application::preview::convert::convert_element;
use crate::application::preview::grid::reconcile;
use crate::application::preview::models::ModelRegistry;
use crate::application::preview::normalize::Normalizer;
use crate::application::preview::view::{ViewData, ViewRenderer};
use crate::domain::blocks::{BlockValue, GridLayoutItem};
use crate::domain::instance::{BlockVariant, TypedBlockInstance};

/// Renders preview markup for one block value.
#[async_trait]
pub trait BlockPreviewService: Send + Sync {
    fn variant(&self) -> BlockVariant;

    /// Returns the markup for the first content item of `block_value`, or an
    /// empty string when there is nothing to render.
    async fn get_markup_for_block(
        &self,
        block_value: BlockValue,
        data_type_key: &str,
        ctx: &RenderContext,
        culture: Option<&str>,
    ) -> Result<String, PreviewError>;
}

/// A block converted and bound to its model, ready for the policy step.
#[derive(Debug)]
pub struct PreparedBlock {
    pub instance: Option<TypedBlockInstance>,
    pub content_alias: String,
    pub content_type_key: Uuid,
}

/// Steps shared by both preview policies.
pub struct PreviewPipeline {
    converter: Arc<dyn ElementConverter>,
    models: Arc<ModelRegistry>,
    normalizer: Normalizer,
    views: ViewRenderer,
}

impl PreviewPipeline {
    pub fn new(
        converter: Arc<dyn ElementConverter>,
        models: Arc<ModelRegistry>,
        normalizer: Normalizer,
        views: ViewRenderer,
    ) -> Self {
        Self {
            converter,
            models,
            normalizer,
            views,
        }
    }

    /// Normalizes, converts and binds the first content and settings items.
    ///
    /// `Ok(None)` means the value carries no content item.
    pub async fn prepare(
        &self,
        variant: BlockVariant,
        block_value: BlockValue,
    ) -> Result<Option<PreparedBlock>, PreviewError> {
        let BlockValue {
            content_data,
            settings_data,
            ..
        } = block_value;

        let Some(mut content_data) = content_data.into_iter().next() else {
            debug!("block value has no content item");
            return Ok(None);
        };
        let settings_data = settings_data.into_iter().next();

        self.normalizer.normalize(&mut content_data);

        let converter = self.converter.as_ref();
        let Some(content_element) = convert_element(converter, &content_data, true).await? else {
            return Err(PreviewError::conversion(content_data.content_type_label()));
        };
        let settings_element = match settings_data.as_ref() {
            Some(settings) => convert_element(converter, settings, false).await?,
            None => None,
        };

        let content_alias = content_element.alias().to_string();
        let content_type_key = content_element.content_type.key;
        Span::current().record("alias", content_alias.as_str());

        let content_type = self.models.resolve(Some(&content_alias));
        if content_type.is_none() {
            warn!(alias = %content_alias, "no model registered for content type");
        }
        let settings_type = settings_element
            .as_ref()
            .and_then(|element| self.models.resolve(Some(element.alias())));

        let instance = build_instance(
            variant,
            content_type,
            Some(content_element),
            settings_type,
            settings_element,
            content_data.udi.clone(),
            settings_data.and_then(|settings| settings.udi),
        );

        Ok(Some(PreparedBlock {
            instance,
            content_alias,
            content_type_key,
        }))
    }

    /// Wraps the instance into view data and renders it.
    pub async fn render(
        &self,
        ctx: &RenderContext,
        variant: BlockVariant,
        prepared: PreparedBlock,
    ) -> Result<String, PreviewError> {
        let view_data = ViewData::for_block(variant, prepared.instance, ctx);
        self.views
            .render(ctx, &prepared.content_alias, &view_data, variant)
            .await
    }
}

async fn observed<F>(variant: BlockVariant, future: F) -> Result<String, PreviewError>
where
    F: Future<Output = Result<String, PreviewError>>,
{
    let started = Instant::now();
    let result = future.await;
    let outcome = match &result {
        Ok(html) if html.is_empty() => "empty",
        Ok(_) => "rendered",
        Err(err) => err.kind(),
    };

    counter!(
        "block_preview_render_total",
        "variant" => variant.as_str(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!("block_preview_render_ms", "variant" => variant.as_str())
        .record(started.elapsed().as_secs_f64() * 1000.0);

    result
}

/// Block list previews.
pub struct ListPreviewService {
    pipeline: Arc<PreviewPipeline>,
}

impl ListPreviewService {
    pub fn new(pipeline: Arc<PreviewPipeline>) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl BlockPreviewService for ListPreviewService {
    fn variant(&self) -> BlockVariant {
        BlockVariant::List
    }

    async fn get_markup_for_block(
        &self,
        block_value: BlockValue,
        data_type_key: &str,
        ctx: &RenderContext,
        culture: Option<&str>,
    ) -> Result<String, PreviewError> {
        let ctx = ctx.clone().with_culture(culture);
        let span = info_span!(
            "block_preview",
            variant = self.variant().as_str(),
            data_type_key,
            culture = ctx.culture(),
            alias = field::Empty
        );

        observed(
            self.variant(),
            async {
                let Some(prepared) = self.pipeline.prepare(BlockVariant::List, block_value).await?
                else {
                    return Ok(String::new());
                };
                self.pipeline.render(&ctx, BlockVariant::List, prepared).await
            }
            .instrument(span),
        )
        .await
    }
}

/// Block grid previews; adds layout reconciliation before rendering.
pub struct GridPreviewService {
    pipeline: Arc<PreviewPipeline>,
    data_types: Arc<dyn DataTypeConfigStore>,
}

impl GridPreviewService {
    pub fn new(pipeline: Arc<PreviewPipeline>, data_types: Arc<dyn DataTypeConfigStore>) -> Self {
        Self {
            pipeline,
            data_types,
        }
    }

    async fn apply_layout(
        &self,
        ctx: &RenderContext,
        data_type_key: &str,
        layout: Option<&GridLayoutItem>,
        prepared: &mut PreparedBlock,
    ) -> Result<(), PreviewError> {
        let Some(grid_item) = prepared
            .instance
            .as_mut()
            .and_then(TypedBlockInstance::as_grid_mut)
        else {
            debug!("no typed instance to reconcile");
            return Ok(());
        };

        let config = match Uuid::parse_str(data_type_key) {
            Ok(key) => ctx.run(self.data_types.get_grid_config(key)).await??,
            Err(err) => {
                warn!(data_type_key, error = %err, "data type key is not a uuid");
                None
            }
        };

        reconcile(
            config.as_ref(),
            prepared.content_type_key,
            grid_item,
            layout,
        );
        Ok(())
    }
}

#[async_trait]
impl BlockPreviewService for GridPreviewService {
    fn variant(&self) -> BlockVariant {
        BlockVariant::Grid
    }

    async fn get_markup_for_block(
        &self,
        block_value: BlockValue,
        data_type_key: &str,
        ctx: &RenderContext,
        culture: Option<&str>,
    ) -> Result<String, PreviewError> {
        let ctx = ctx.clone().with_culture(culture);
        let span = info_span!(
            "block_preview",
            variant = self.variant().as_str(),
            data_type_key,
            culture = ctx.culture(),
            alias = field::Empty
        );

        observed(
            self.variant(),
            async {
                let layout = GridLayoutItem::from_layout(&block_value.layout);
                let prepared = self.pipeline.prepare(BlockVariant::Grid, block_value).await?;
                let Some(mut prepared) = prepared else {
                    return Ok(String::new());
                };
                self.apply_layout(&ctx, data_type_key, layout.as_ref(), &mut prepared)
                    .await?;
                self.pipeline.render(&ctx, BlockVariant::Grid, prepared).await
            }
            .instrument(span),
        )
        .await
    }
}
