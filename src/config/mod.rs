//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{path::PathBuf, str::FromStr};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::application::preview::ViewLocations;
use crate::application::preview::normalize::DEFAULT_MAX_NESTING_DEPTH;
use crate::application::preview::view::ALIAS_PLACEHOLDER;

mod cli;

pub use cli::{CliArgs, Command, RenderArgs, SharedOverrides, ViewsArgs};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "block-preview";
const ENV_PREFIX: &str = "BLOCK_PREVIEW";
const DEFAULT_TEMPLATES_DIR: &str = "views";
const DEFAULT_CATALOG_PATH: &str = "catalog.toml";

#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub views: ViewSettings,
    pub pipeline: PipelineSettings,
    pub catalog: CatalogSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone)]
pub struct ViewSettings {
    pub templates_dir: PathBuf,
    pub locations: ViewLocations,
}

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub max_nesting_depth: usize,
}

#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub path: PathBuf,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(environment());

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(cli.command.overrides());

    Settings::from_raw(raw)
}

// Search-path lists are comma separated: `BLOCK_PREVIEW__VIEWS__BLOCK_LIST=a/{alias}.html,b/{alias}.html`.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("views.block_list")
        .with_list_parse_key("views.block_grid")
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    views: RawViewSettings,
    pipeline: RawPipelineSettings,
    catalog: RawCatalogSettings,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &SharedOverrides) {
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(dir) = overrides.templates_dir.as_ref() {
            self.views.templates_dir = Some(dir.clone());
        }
        if let Some(path) = overrides.catalog_path.as_ref() {
            self.catalog.path = Some(path.clone());
        }
        if let Some(depth) = overrides.max_nesting_depth {
            self.pipeline.max_nesting_depth = Some(depth);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            logging,
            views,
            pipeline,
            catalog,
        } = raw;

        Ok(Self {
            logging: build_logging_settings(logging)?,
            views: build_view_settings(views)?,
            pipeline: build_pipeline_settings(pipeline)?,
            catalog: build_catalog_settings(catalog)?,
        })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_view_settings(views: RawViewSettings) -> Result<ViewSettings, LoadError> {
    let templates_dir = views
        .templates_dir
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATES_DIR));
    if templates_dir.as_os_str().is_empty() {
        return Err(LoadError::invalid(
            "views.templates_dir",
            "path must not be empty",
        ));
    }

    let defaults = ViewLocations::default();
    let block_list = search_paths(views.block_list, defaults.block_list, "views.block_list")?;
    let block_grid = search_paths(views.block_grid, defaults.block_grid, "views.block_grid")?;

    Ok(ViewSettings {
        templates_dir,
        locations: ViewLocations {
            block_list,
            block_grid,
        },
    })
}

fn search_paths(
    configured: Option<Vec<String>>,
    default: Vec<String>,
    key: &'static str,
) -> Result<Vec<String>, LoadError> {
    let paths = configured.unwrap_or(default);
    if paths.is_empty() {
        return Err(LoadError::invalid(key, "at least one search path is required"));
    }
    if let Some(path) = paths.iter().find(|path| !path.contains(ALIAS_PLACEHOLDER)) {
        return Err(LoadError::invalid(
            key,
            format!("`{path}` does not contain the {ALIAS_PLACEHOLDER} placeholder"),
        ));
    }
    Ok(paths)
}

fn build_pipeline_settings(pipeline: RawPipelineSettings) -> Result<PipelineSettings, LoadError> {
    let max_nesting_depth = pipeline
        .max_nesting_depth
        .unwrap_or(DEFAULT_MAX_NESTING_DEPTH);
    if max_nesting_depth == 0 {
        return Err(LoadError::invalid(
            "pipeline.max_nesting_depth",
            "must be greater than zero",
        ));
    }

    Ok(PipelineSettings { max_nesting_depth })
}

fn build_catalog_settings(catalog: RawCatalogSettings) -> Result<CatalogSettings, LoadError> {
    let path = catalog
        .path
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH));
    if path.as_os_str().is_empty() {
        return Err(LoadError::invalid("catalog.path", "path must not be empty"));
    }

    Ok(CatalogSettings { path })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawViewSettings {
    templates_dir: Option<PathBuf>,
    block_list: Option<Vec<String>>,
    block_grid: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawPipelineSettings {
    max_nesting_depth: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCatalogSettings {
    path: Option<PathBuf>,
}

#[cfg(test)]
mod tests;
