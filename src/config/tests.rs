use std::io::Write;

use super::*;

#[test]
fn defaults_are_valid() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert_eq!(settings.logging.format, LogFormat::Compact);
    assert_eq!(settings.views.templates_dir, PathBuf::from("views"));
    assert_eq!(settings.views.locations, ViewLocations::default());
    assert_eq!(settings.pipeline.max_nesting_depth, 32);
    assert_eq!(settings.catalog.path, PathBuf::from("catalog.toml"));
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("info".to_string());
    raw.views.templates_dir = Some(PathBuf::from("from-file"));

    let overrides = SharedOverrides {
        log_level: Some("debug".to_string()),
        log_json: Some(true),
        templates_dir: Some(PathBuf::from("from-cli")),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert_eq!(settings.logging.format, LogFormat::Json);
    assert_eq!(settings.views.templates_dir, PathBuf::from("from-cli"));
}

#[test]
fn search_paths_require_placeholder() {
    let mut raw = RawSettings::default();
    raw.views.block_grid = Some(vec!["blockgrid/static.html".to_string()]);

    let err = Settings::from_raw(raw).expect_err("placeholder missing");
    assert!(matches!(err, LoadError::Invalid { key: "views.block_grid", .. }));
}

#[test]
fn empty_search_paths_are_rejected() {
    let mut raw = RawSettings::default();
    raw.views.block_list = Some(Vec::new());

    let err = Settings::from_raw(raw).expect_err("empty list");
    assert!(matches!(err, LoadError::Invalid { key: "views.block_list", .. }));
}

#[test]
fn zero_nesting_depth_is_rejected() {
    let mut raw = RawSettings::default();
    raw.apply_overrides(&SharedOverrides {
        max_nesting_depth: Some(0),
        ..Default::default()
    });

    let err = Settings::from_raw(raw).expect_err("zero depth");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "pipeline.max_nesting_depth",
            ..
        }
    ));
}

#[test]
fn invalid_log_level_is_rejected() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("loud".to_string());
    assert!(Settings::from_raw(raw).is_err());
}

#[test]
fn config_file_layers_under_cli() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp file");
    writeln!(
        file,
        "[views]\nblock_list = [\"partials/{{alias}}.html\"]\n[pipeline]\nmax_nesting_depth = 4"
    )
    .expect("write config");

    let args = CliArgs::parse_from([
        "block-preview",
        "--config-file",
        file.path().to_str().expect("utf-8 path"),
        "views",
        "--max-nesting-depth",
        "8",
    ]);
    let settings = load(&args).expect("loads");

    assert_eq!(settings.views.locations.block_list, ["partials/{alias}.html"]);
    assert_eq!(settings.pipeline.max_nesting_depth, 8);
}

#[test]
fn environment_overrides_search_path_lists() {
    let vars = config::Map::from([
        (
            "BLOCK_PREVIEW__VIEWS__BLOCK_LIST".to_string(),
            "partials/{alias}.html,partials/Components/{alias}.html".to_string(),
        ),
        (
            "BLOCK_PREVIEW__PIPELINE__MAX_NESTING_DEPTH".to_string(),
            "6".to_string(),
        ),
    ]);

    let raw: RawSettings = Config::builder()
        .add_source(environment().source(Some(vars)))
        .build()
        .expect("builds")
        .try_deserialize()
        .expect("deserializes");
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(
        settings.views.locations.block_list,
        ["partials/{alias}.html", "partials/Components/{alias}.html"]
    );
    assert_eq!(
        settings.views.locations.block_grid,
        ViewLocations::default().block_grid
    );
    assert_eq!(settings.pipeline.max_nesting_depth, 6);
}

#[test]
fn parse_render_arguments() {
    let args = CliArgs::parse_from([
        "block-preview",
        "render",
        "body.json",
        "--data-type-key",
        "5c1b7e2a-0d3f-4b6a-9e8c-1a2b3c4d5e6f",
        "--grid",
        "--culture",
        "fr-FR",
        "--page-id",
        "1054",
        "--templates-dir",
        "/srv/views",
    ]);

    match args.command {
        Command::Render(render) => {
            assert_eq!(render.body, PathBuf::from("body.json"));
            assert!(render.grid);
            assert_eq!(render.culture.as_deref(), Some("fr-FR"));
            assert_eq!(render.page_id, Some(1054));
            assert_eq!(
                render.overrides.templates_dir,
                Some(PathBuf::from("/srv/views"))
            );
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_views_arguments() {
    let args = CliArgs::parse_from(["block-preview", "views", "--log-json", "true"]);
    assert!(matches!(args.command, Command::Views(_)));
    assert_eq!(args.command.overrides().log_json, Some(true));
}
