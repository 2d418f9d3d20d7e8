use std::{path::Path, process, sync::Arc};

use block_preview::{
    application::{
        error::AppError,
        preview::{
            BlockPreviewer, GridPreviewService, ListPreviewService, Normalizer, PreviewPipeline,
            PreviewQuery, PreviewRequest, ViewRenderer,
        },
    },
    config::{self, Command, RenderArgs, Settings},
    infra::{
        catalog::{CatalogElementConverter, CatalogStore},
        components::ComponentRegistry,
        error::InfraError,
        telemetry,
        views::TeraViewEngine,
    },
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

const STDIN_MARKER: &str = "-";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_writer(std::io::stderr)
        .with_max_level(Level::ERROR)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;
    telemetry::init(&settings.logging)?;

    match cli_args.command {
        Command::Render(args) => run_render(settings, *args).await,
        Command::Views(_) => run_views(settings).await,
    }
}

async fn run_render(settings: Settings, args: RenderArgs) -> Result<(), AppError> {
    let previewer = build_previewer(&settings).await?;
    let request_body = read_body(&args.body).await?;

    let request = PreviewRequest {
        block_editor_alias: args.block_editor_alias,
        culture: args.culture,
        page_key: args.page_key,
        request_body,
    };
    let query = PreviewQuery {
        data_type_key: args.data_type_key,
        is_grid: args.grid,
        page_id: args.page_id,
    };

    let html = previewer
        .preview(&request, &query, CancellationToken::new())
        .await?;
    info!(bytes = html.len(), "rendered block preview");

    write_stdout(&html).await
}

async fn run_views(settings: Settings) -> Result<(), AppError> {
    let engine = TeraViewEngine::from_dir(&settings.views.templates_dir)?;

    let mut out = String::new();
    for name in engine.template_names() {
        out.push_str(name);
        out.push('\n');
    }
    write_stdout(&out).await
}

async fn build_previewer(settings: &Settings) -> Result<BlockPreviewer, AppError> {
    let engine = TeraViewEngine::from_dir(&settings.views.templates_dir)?;
    let catalog = Arc::new(CatalogStore::load(&settings.catalog.path).await?);
    let models = Arc::new(catalog.model_registry());
    info!(models = models.len(), "registered block models");

    let views = ViewRenderer::new(
        Arc::new(engine),
        Arc::new(ComponentRegistry::new()),
        settings.views.locations.clone(),
    );
    let pipeline = Arc::new(PreviewPipeline::new(
        Arc::new(CatalogElementConverter::new(catalog.clone())),
        models,
        Normalizer::new(settings.pipeline.max_nesting_depth),
        views,
    ));

    Ok(BlockPreviewer::new(
        Arc::new(ListPreviewService::new(pipeline.clone())),
        Arc::new(GridPreviewService::new(pipeline, catalog)),
    ))
}

async fn read_body(path: &Path) -> Result<String, AppError> {
    if path.as_os_str() == STDIN_MARKER {
        let mut body = String::new();
        tokio::io::stdin()
            .read_to_string(&mut body)
            .await
            .map_err(InfraError::from)?;
        return Ok(body);
    }

    tokio::fs::read_to_string(path)
        .await
        .map_err(|err| AppError::unexpected(format!("failed to read `{}`: {err}", path.display())))
}

async fn write_stdout(text: &str) -> Result<(), AppError> {
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(text.as_bytes())
        .await
        .map_err(InfraError::from)?;
    stdout
        .flush()
        .await
        .map_err(InfraError::from)?;
    Ok(())
}
