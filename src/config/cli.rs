use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};
use uuid::Uuid;

/// Command-line arguments for the block-preview binary.
#[derive(Debug, Parser)]
#[command(
    name = "block-preview",
    version,
    about = "Render backoffice previews of block list and block grid items"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "BLOCK_PREVIEW_CONFIG_FILE",
        value_name = "PATH"
    )]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Render the preview markup of one block value to stdout.
    Render(Box<RenderArgs>),
    /// List the templates the view engine loaded.
    Views(ViewsArgs),
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub overrides: SharedOverrides,

    /// File holding the block value JSON; `-` reads stdin.
    #[arg(value_name = "BODY", value_hint = ValueHint::FilePath)]
    pub body: PathBuf,

    /// Key of the data type the block belongs to.
    #[arg(long = "data-type-key", value_name = "KEY")]
    pub data_type_key: String,

    /// Render with the block grid policy.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub grid: bool,

    /// Culture to render under.
    #[arg(long, value_name = "CULTURE")]
    pub culture: Option<String>,

    /// Id of the page being edited.
    #[arg(long = "page-id", value_name = "ID")]
    pub page_id: Option<i64>,

    /// Key of the page being edited.
    #[arg(long = "page-key", value_name = "UUID")]
    pub page_key: Option<Uuid>,

    /// Alias of the block editor that posted the value.
    #[arg(long = "block-editor-alias", value_name = "ALIAS")]
    pub block_editor_alias: Option<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ViewsArgs {
    #[command(flatten)]
    pub overrides: SharedOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct SharedOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the templates root directory.
    #[arg(long = "templates-dir", value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub templates_dir: Option<PathBuf>,

    /// Override the catalog file.
    #[arg(long = "catalog-path", value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub catalog_path: Option<PathBuf>,

    /// Override the nesting depth at which nested block values stop expanding.
    #[arg(long = "max-nesting-depth", value_name = "DEPTH")]
    pub max_nesting_depth: Option<usize>,
}

impl Command {
    pub fn overrides(&self) -> &SharedOverrides {
        match self {
            Command::Render(args) => &args.overrides,
            Command::Views(args) => &args.overrides,
        }
    }
}
