//! View resolution and rendering for preview markup.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::application::error::PreviewError;
use crate::application::ports::{ViewComponent, ViewComponentRegistry, ViewEngine};
use crate::application::preview::context::RenderContext;
use crate::domain::instance::{BlockVariant, TypedBlockInstance};
use crate::util::casing::to_pascal_case;

/// Placeholder substituted with the content-type alias in search paths.
pub const ALIAS_PLACEHOLDER: &str = "{alias}";

/// Data handed to a view: the block model plus preview flags.
#[derive(Debug, Clone, Serialize)]
pub struct ViewData {
    pub model: Option<TypedBlockInstance>,
    #[serde(rename = "blockPreview")]
    pub block_preview: bool,
    #[serde(rename = "blockGridPreview")]
    pub block_grid_preview: bool,
    pub culture: Option<String>,
}

impl ViewData {
    pub fn for_block(
        variant: BlockVariant,
        model: Option<TypedBlockInstance>,
        ctx: &RenderContext,
    ) -> Self {
        Self {
            model,
            block_preview: true,
            block_grid_preview: variant == BlockVariant::Grid,
            culture: ctx.culture().map(str::to_string),
        }
    }
}

/// Ordered template search paths per block variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewLocations {
    pub block_list: Vec<String>,
    pub block_grid: Vec<String>,
}

impl Default for ViewLocations {
    fn default() -> Self {
        Self {
            block_list: vec![
                "blocklist/Components/{alias}.html".to_string(),
                "blocklist/{alias}.html".to_string(),
            ],
            block_grid: vec![
                "blockgrid/Components/{alias}.html".to_string(),
                "blockgrid/{alias}.html".to_string(),
            ],
        }
    }
}

impl ViewLocations {
    pub fn for_variant(&self, variant: BlockVariant) -> &[String] {
        match variant {
            BlockVariant::List => &self.block_list,
            BlockVariant::Grid => &self.block_grid,
        }
    }
}

pub fn format_view_path(template: &str, alias: &str) -> String {
    template.replace(ALIAS_PLACEHOLDER, alias)
}

/// Turns view data into markup via a view component or a partial template.
pub struct ViewRenderer {
    engine: Arc<dyn ViewEngine>,
    components: Arc<dyn ViewComponentRegistry>,
    locations: ViewLocations,
}

impl ViewRenderer {
    pub fn new(
        engine: Arc<dyn ViewEngine>,
        components: Arc<dyn ViewComponentRegistry>,
        locations: ViewLocations,
    ) -> Self {
        Self {
            engine,
            components,
            locations,
        }
    }

    /// Renders `view_data` for `alias`.
    ///
    /// A registered view component wins. Otherwise each search path for the
    /// variant is tried with the alias verbatim and then in PascalCase; the
    /// first template that resolves is rendered. No match yields an empty
    /// string.
    pub async fn render(
        &self,
        ctx: &RenderContext,
        alias: &str,
        view_data: &ViewData,
        variant: BlockVariant,
    ) -> Result<String, PreviewError> {
        ctx.ensure_active()?;

        if let Some(component) = self.components.select_component(alias) {
            return self.render_component(component.as_ref(), view_data);
        }

        self.render_partial(ctx, alias, view_data, variant).await
    }

    fn render_component(
        &self,
        component: &dyn ViewComponent,
        view_data: &ViewData,
    ) -> Result<String, PreviewError> {
        debug!(component = component.name(), "rendering view component");
        Ok(component.invoke(view_data)?)
    }

    async fn render_partial(
        &self,
        ctx: &RenderContext,
        alias: &str,
        view_data: &ViewData,
        variant: BlockVariant,
    ) -> Result<String, PreviewError> {
        let pascal = to_pascal_case(alias);

        for template in self.locations.for_variant(variant) {
            let mut path = format_view_path(template, alias);
            let mut view = ctx.run(self.engine.resolve_view(&path)).await?;

            if view.is_none() && pascal != alias {
                path = format_view_path(template, &pascal);
                view = ctx.run(self.engine.resolve_view(&path)).await?;
            }

            let Some(view) = view else {
                continue;
            };

            debug!(path = %view.path(), "rendering partial view");
            let html = ctx.run(self.engine.render(&view, view_data)).await??;
            return Ok(html);
        }

        info!(alias, variant = variant.as_str(), "no preview view found");
        Ok(String::new())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::application::ports::{ViewError, ViewHandle};

    #[derive(Default)]
    struct RecordingEngine {
        templates: HashMap<String, String>,
        attempts: Mutex<Vec<String>>,
    }

    impl RecordingEngine {
        fn with(mut self, path: &str, body: &str) -> Self {
            self.templates.insert(path.to_string(), body.to_string());
            self
        }

        fn attempts(&self) -> Vec<String> {
            self.attempts.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl ViewEngine for RecordingEngine {
        async fn resolve_view(&self, path: &str) -> Option<ViewHandle> {
            self.attempts.lock().expect("lock").push(path.to_string());
            self.templates
                .contains_key(path)
                .then(|| ViewHandle::new(path))
        }

        async fn render(
            &self,
            view: &ViewHandle,
            view_data: &ViewData,
        ) -> Result<String, ViewError> {
            let body = self.templates.get(view.path()).cloned().unwrap_or_default();
            Ok(format!("{body}|preview={}", view_data.block_preview))
        }
    }

    struct NoComponents;

    impl ViewComponentRegistry for NoComponents {
        fn select_component(&self, _alias: &str) -> Option<Arc<dyn ViewComponent>> {
            None
        }
    }

    struct Banner;

    impl ViewComponent for Banner {
        fn name(&self) -> &str {
            "Banner"
        }

        fn invoke(&self, view_data: &ViewData) -> Result<String, ViewError> {
            Ok(format!("<banner grid={}/>", view_data.block_grid_preview))
        }
    }

    struct OnlyBanner;

    impl ViewComponentRegistry for OnlyBanner {
        fn select_component(&self, alias: &str) -> Option<Arc<dyn ViewComponent>> {
            (alias == "banner").then(|| Arc::new(Banner) as Arc<dyn ViewComponent>)
        }
    }

    fn view_data(variant: BlockVariant) -> ViewData {
        ViewData::for_block(variant, None, &RenderContext::new())
    }

    fn renderer(
        engine: Arc<RecordingEngine>,
        components: Arc<dyn ViewComponentRegistry>,
    ) -> ViewRenderer {
        ViewRenderer::new(engine, components, ViewLocations::default())
    }

    async fn render(
        renderer: ViewRenderer,
        alias: &str,
        variant: BlockVariant,
    ) -> Result<String, PreviewError> {
        renderer
            .render(&RenderContext::new(), alias, &view_data(variant), variant)
            .await
    }

    #[tokio::test]
    async fn no_template_renders_empty_string() {
        let engine = Arc::new(RecordingEngine::default());
        let views = renderer(engine.clone(), Arc::new(NoComponents));
        let html = render(views, "hero", BlockVariant::List).await.expect("renders");

        assert_eq!(html, "");
        assert_eq!(
            engine.attempts(),
            [
                "blocklist/Components/hero.html",
                "blocklist/Components/Hero.html",
                "blocklist/hero.html",
                "blocklist/Hero.html",
            ]
        );
    }

    #[tokio::test]
    async fn first_resolvable_path_wins() {
        let engine = Arc::new(
            RecordingEngine::default()
                .with("blockgrid/Components/Hero.html", "<components/>")
                .with("blockgrid/hero.html", "<fallback/>"),
        );
        let views = renderer(engine.clone(), Arc::new(NoComponents));
        let html = render(views, "hero", BlockVariant::Grid).await.expect("renders");

        assert_eq!(html, "<components/>|preview=true");
        assert_eq!(
            engine.attempts(),
            ["blockgrid/Components/hero.html", "blockgrid/Components/Hero.html"]
        );
    }

    #[tokio::test]
    async fn pascal_case_retry_is_skipped_when_identical() {
        let engine = Arc::new(RecordingEngine::default());
        let views = renderer(engine.clone(), Arc::new(NoComponents));
        render(views, "Hero", BlockVariant::List).await.expect("renders");

        assert_eq!(
            engine.attempts(),
            ["blocklist/Components/Hero.html", "blocklist/Hero.html"]
        );
    }

    #[tokio::test]
    async fn view_component_takes_priority() {
        let engine =
            Arc::new(RecordingEngine::default().with("blockgrid/banner.html", "<partial/>"));
        let views = renderer(engine.clone(), Arc::new(OnlyBanner));
        let html = render(views, "banner", BlockVariant::Grid).await.expect("renders");

        assert_eq!(html, "<banner grid=true/>");
        assert!(engine.attempts().is_empty());
    }

    #[tokio::test]
    async fn cancelled_render_stops_before_resolution() {
        let engine = Arc::new(RecordingEngine::default());
        let token = tokio_util::sync::CancellationToken::new();
        token.cancel();
        let ctx = RenderContext::new().with_cancellation(token);

        let result = renderer(engine.clone(), Arc::new(NoComponents))
            .render(&ctx, "hero", &view_data(BlockVariant::List), BlockVariant::List)
            .await;

        assert!(matches!(result, Err(PreviewError::Cancelled)));
        assert!(engine.attempts().is_empty());
    }

    #[test]
    fn grid_flag_follows_variant() {
        assert!(view_data(BlockVariant::Grid).block_grid_preview);
        assert!(!view_data(BlockVariant::List).block_grid_preview);
        assert!(view_data(BlockVariant::List).block_preview);
    }
}
