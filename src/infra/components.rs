//! In-process registry of code-driven view components.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::application::ports::{ViewComponent, ViewComponentRegistry, ViewError};
use crate::application::preview::ViewData;
use crate::util::casing::names_match;

/// Conventional suffix on component names; ignored when matching aliases.
pub const COMPONENT_SUFFIX: &str = "ViewComponent";

type RenderFn = dyn Fn(&ViewData) -> Result<String, ViewError> + Send + Sync;

/// A view component backed by a closure.
pub struct FnComponent {
    name: String,
    render: Box<RenderFn>,
}

impl FnComponent {
    pub fn new<F>(name: impl Into<String>, render: F) -> Self
    where
        F: Fn(&ViewData) -> Result<String, ViewError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            render: Box::new(render),
        }
    }
}

impl fmt::Debug for FnComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnComponent")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl ViewComponent for FnComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&self, view_data: &ViewData) -> Result<String, ViewError> {
        (self.render)(view_data)
    }
}

/// Components in registration order; the first whose name matches wins.
#[derive(Default, Clone)]
pub struct ComponentRegistry {
    components: Vec<Arc<dyn ViewComponent>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, component: Arc<dyn ViewComponent>) {
        self.components.push(component);
    }

    pub fn with_component(mut self, component: impl ViewComponent + 'static) -> Self {
        self.register(Arc::new(component));
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.components.iter().map(|component| component.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

fn component_matches(component_name: &str, alias: &str) -> bool {
    let base = component_name
        .strip_suffix(COMPONENT_SUFFIX)
        .filter(|base| !base.is_empty())
        .unwrap_or(component_name);
    names_match(base, alias)
}

impl ViewComponentRegistry for ComponentRegistry {
    fn select_component(&self, alias: &str) -> Option<Arc<dyn ViewComponent>> {
        let selected = self
            .components
            .iter()
            .find(|component| component_matches(component.name(), alias))
            .cloned();
        if let Some(component) = &selected {
            debug!(alias, component = component.name(), "selected view component");
        }
        selected
    }
}
