//! Partial-view engine backed by runtime-loaded Tera templates.

use std::path::Path;

use async_trait::async_trait;
use tera::{Context, Tera};
use tracing::{debug, info};

use crate::application::error::error_chain;
use crate::application::ports::{ViewEngine, ViewError, ViewHandle};
use crate::application::preview::ViewData;

use super::error::InfraError;

/// Tera templates addressed by their path relative to the templates root,
/// e.g. `blocklist/Components/hero.html`.
pub struct TeraViewEngine {
    tera: Tera,
}

impl TeraViewEngine {
    /// Loads every template below `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, InfraError> {
        let dir = dir.as_ref();
        let dir_label = dir.display().to_string();
        if !dir.is_dir() {
            return Err(InfraError::templates(dir_label, "directory does not exist"));
        }

        let glob = format!("{}/**/*", dir_label.trim_end_matches('/'));
        let tera =
            Tera::new(&glob).map_err(|err| InfraError::templates(&dir_label, error_chain(&err)))?;

        let engine = Self::from_tera(tera);
        info!(
            dir = %dir_label,
            templates = engine.template_names().len(),
            "loaded preview templates"
        );
        Ok(engine)
    }

    pub fn from_tera(tera: Tera) -> Self {
        Self { tera }
    }

    /// Builds an engine from in-memory `(path, source)` pairs.
    pub fn from_raw<I, N, S>(templates: I) -> Result<Self, InfraError>
    where
        I: IntoIterator<Item = (N, S)>,
        N: AsRef<str>,
        S: AsRef<str>,
    {
        let mut tera = Tera::default();
        tera.add_raw_templates(templates)
            .map_err(|err| InfraError::templates("<memory>", error_chain(&err)))?;
        Ok(Self::from_tera(tera))
    }

    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tera.get_template_names().collect();
        names.sort_unstable();
        names
    }
}

fn template_name(path: &str) -> &str {
    path.trim_start_matches('~').trim_start_matches('/')
}

#[async_trait]
impl ViewEngine for TeraViewEngine {
    async fn resolve_view(&self, path: &str) -> Option<ViewHandle> {
        let name = template_name(path);
        let found = self.tera.get_template_names().any(|candidate| candidate == name);
        debug!(path = name, found, "resolving preview view");
        found.then(|| ViewHandle::new(name))
    }

    async fn render(&self, view: &ViewHandle, view_data: &ViewData) -> Result<String, ViewError> {
        let context = Context::from_serialize(view_data)
            .map_err(|err| ViewError::template(view.path(), error_chain(&err)))?;
        self.tera
            .render(view.path(), &context)
            .map_err(|err| ViewError::template(view.path(), error_chain(&err)))
    }
}
