use serde::Serialize;
use thiserror::Error;

use crate::domain::items::{Item, ItemId, RunTarget};

/// A code sample after highlighting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSample {
    pub label: String,
    pub language: Option<String>,
    /// Highlighted `<pre>` block ready to embed.
    pub code_html: String,
    /// Carried over from the item so the caller can execute the sample.
    pub run: Option<RunTarget>,
}

/// Deterministic rendering result for one item. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedPage {
    pub id: ItemId,
    pub title: String,
    /// File name of the page inside the generated site.
    pub file_name: String,
    /// Sanitised HTML of the item description.
    pub description_html: String,
    pub samples: Vec<RenderedSample>,
}

impl RenderedPage {
    pub fn runnable_samples(&self) -> impl Iterator<Item = (usize, &RenderedSample)> {
        self.samples
            .iter()
            .enumerate()
            .filter(|(_, sample)| sample.run.is_some())
    }
}

/// Structured errors surfaced by the rendering pipeline. Each one is fatal to
/// a single item's page only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("item {item_id}: code sample #{position} is missing a label")]
    MissingLabel { item_id: ItemId, position: usize },
    #[error("markdown rendering failed: {message}")]
    Markdown { message: String },
    #[error("syntax highlighting failed: {language}: {message}")]
    Highlighting { language: String, message: String },
    #[error("template rendering failed: {message}")]
    Template { message: String },
}

/// Trait exposed by the rendering pipeline. Implementations must be pure and
/// deterministic: given the same item, they return identical pages or errors.
pub trait RenderService: Send + Sync {
    fn render(&self, item: &Item) -> Result<RenderedPage, RenderError>;
}
