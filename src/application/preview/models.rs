use std::collections::HashMap;

use tracing::warn;

use crate::domain::instance::ModelType;

/// Registry of generated models keyed by content-type alias.
///
/// Built once at startup; lookups are pure. When two models claim the same
/// alias the first registration wins.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    by_alias: HashMap<String, ModelType>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `model`, returning `false` when its alias is already taken.
    pub fn register(&mut self, model: ModelType) -> bool {
        let alias = model.content_type_alias().to_string();
        if let Some(existing) = self.by_alias.get(&alias) {
            warn!(
                alias = %alias,
                kept = existing.name(),
                ignored = model.name(),
                "duplicate model registration"
            );
            return false;
        }
        self.by_alias.insert(alias, model);
        true
    }

    pub fn with_model(mut self, model: ModelType) -> Self {
        self.register(model);
        self
    }

    pub fn resolve(&self, content_type_alias: Option<&str>) -> Option<&ModelType> {
        content_type_alias.and_then(|alias| self.by_alias.get(alias))
    }

    pub fn len(&self) -> usize {
        self.by_alias.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_alias.is_empty()
    }
}

impl FromIterator<ModelType> for ModelRegistry {
    fn from_iter<I: IntoIterator<Item = ModelType>>(iter: I) -> Self {
        let mut registry = Self::new();
        for model in iter {
            registry.register(model);
        }
        registry
    }
}
