use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rendering request passed into the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRequest {
    /// Slug of the post being rendered, used only for diagnostics.
    pub slug: String,
    /// Markdown body as stored.
    pub markdown: String,
}

impl RenderRequest {
    pub fn new(slug: impl Into<String>, markdown: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            markdown: markdown.into(),
        }
    }
}

/// Deterministic rendering result returned to callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOutput {
    pub html: String,
    /// Legacy asset URLs pointed at the CDN before parsing.
    pub legacy_urls_rewritten: usize,
    /// Captioned images wrapped in `<figure>`.
    pub figures: usize,
}

#[derive(Debug, Clone, Error)]
pub enum RenderError {
    #[error("markdown rendering failed: {message}")]
    Markdown { message: String },
}

/// Implementations must be pure: the same input yields the same output.
pub trait RenderService: Send + Sync {
    fn render(&self, request: &RenderRequest) -> Result<RenderOutput, RenderError>;
}
