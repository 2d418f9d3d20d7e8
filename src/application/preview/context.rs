use std::future::Future;

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::application::error::PreviewError;

/// Request-scoped state threaded through one preview render.
///
/// The culture lives here rather than in any shared service, so concurrent
/// renders for different requests never observe each other's culture.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    culture: Option<String>,
    page_id: Option<i64>,
    page_key: Option<Uuid>,
    cancellation: CancellationToken,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `culture` when it is non-empty; otherwise keeps the current one.
    pub fn with_culture(mut self, culture: Option<&str>) -> Self {
        if let Some(culture) = culture.map(str::trim).filter(|value| !value.is_empty()) {
            self.culture = Some(culture.to_string());
        }
        self
    }

    pub fn with_page_id(mut self, page_id: Option<i64>) -> Self {
        self.page_id = page_id;
        self
    }

    pub fn with_page_key(mut self, page_key: Option<Uuid>) -> Self {
        self.page_key = page_key;
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn culture(&self) -> Option<&str> {
        self.culture.as_deref()
    }

    pub fn page_id(&self) -> Option<i64> {
        self.page_id
    }

    pub fn page_key(&self) -> Option<Uuid> {
        self.page_key
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn ensure_active(&self) -> Result<(), PreviewError> {
        if self.is_cancelled() {
            return Err(PreviewError::Cancelled);
        }
        Ok(())
    }

    /// Drives `future` until it completes or the render is cancelled.
    pub async fn run<F, T>(&self, future: F) -> Result<T, PreviewError>
    where
        F: Future<Output = T>,
    {
        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => Err(PreviewError::Cancelled),
            output = future => Ok(output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_culture_is_ignored() {
        let ctx = RenderContext::new().with_culture(Some("  "));
        assert_eq!(ctx.culture(), None);

        let ctx = ctx.with_culture(Some("fr-FR")).with_culture(None);
        assert_eq!(ctx.culture(), Some("fr-FR"));
    }

    #[test]
    fn scoped_culture_does_not_touch_the_original() {
        let base = RenderContext::new();
        let scoped = base.clone().with_culture(Some("da-DK"));
        assert_eq!(base.culture(), None);
        assert_eq!(scoped.culture(), Some("da-DK"));
    }

    #[tokio::test]
    async fn run_returns_cancelled_once_token_fires() {
        let token = CancellationToken::new();
        let ctx = RenderContext::new().with_cancellation(token.clone());
        token.cancel();

        let result = ctx.run(std::future::pending::<()>()).await;
        assert!(matches!(result, Err(PreviewError::Cancelled)));
        assert!(ctx.ensure_active().is_err());
    }

    #[tokio::test]
    async fn run_passes_output_through() {
        let ctx = RenderContext::new();
        let value = ctx.run(async { 7 }).await.expect("not cancelled");
        assert_eq!(value, 7);
    }
}
