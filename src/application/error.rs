use std::error::Error as StdError;

use thiserror::Error;

use crate::application::ports::{StoreError, ViewError};
use crate::config::LoadError;
use crate::infra::error::InfraError;

/// Failures surfaced by a preview render.
///
/// Unresolved models, missing templates and missing grid configuration are
/// not errors; they degrade to partial or empty markup.
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("unable to find element `{alias}`")]
    Conversion { alias: String },
    #[error("request body is not a block value")]
    InvalidPayload(#[source] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    View(#[from] ViewError),
    #[error("preview render was cancelled")]
    Cancelled,
}

impl PreviewError {
    pub fn conversion(alias: impl Into<String>) -> Self {
        Self::Conversion {
            alias: alias.into(),
        }
    }

    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            PreviewError::Conversion { .. } => "conversion",
            PreviewError::InvalidPayload(_) => "invalid_payload",
            PreviewError::Store(_) => "store",
            PreviewError::View(_) => "view",
            PreviewError::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Preview(#[from] PreviewError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}

/// Flattens an error and its sources into one line for reporting.
pub fn error_chain(error: &dyn StdError) -> String {
    let mut messages = vec![error.to_string()];
    let mut current = error.source();
    while let Some(inner) = current {
        messages.push(inner.to_string());
        current = inner.source();
    }
    messages.join(": ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_error_names_alias() {
        let err = PreviewError::conversion("hero");
        assert_eq!(err.to_string(), "unable to find element `hero`");
        assert_eq!(err.kind(), "conversion");
    }

    #[test]
    fn error_chain_includes_sources() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = PreviewError::InvalidPayload(source);
        let chain = error_chain(&err);
        assert!(chain.starts_with("request body is not a block value: "));
        assert!(chain.len() > "request body is not a block value: ".len());
    }
}
