//! Pipeline stages.
//!
//! A stage rewrites one [`Document`] in place. The two built-in stages are
//! [`ExtractStage`], turning annotated fences into highlight markers, and
//! [`RenderStage`], expanding those markers into HTML.

use std::borrow::Cow;
use std::collections::HashSet;

use linemark_extract::{ExtractError, Extractor};
use linemark_render::{MarkerExpander, RenderError};

use crate::document::Document;

/// Error raised by a stage.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    /// Annotation extraction failed.
    #[error("extract: {0}")]
    Extract(#[from] ExtractError),
    /// Marker expansion failed.
    #[error("render: {0}")]
    Render(#[from] RenderError),
}

/// One step of document processing.
pub trait Stage: Send + Sync {
    /// Stage name used in logs.
    fn name(&self) -> &str;

    /// Rewrite `doc` in place.
    ///
    /// # Errors
    ///
    /// Returns [`StageError`] if the document cannot be processed. The
    /// document content is left unchanged in that case.
    fn apply(&self, doc: &mut Document) -> Result<(), StageError>;
}

/// Converts line-highlight annotations into highlight markers.
pub struct ExtractStage {
    extractor: Extractor,
    eligible: HashSet<String>,
}

impl ExtractStage {
    /// Create a stage processing documents whose extension is in `eligible`.
    #[must_use]
    pub fn new(extractor: Extractor, eligible: HashSet<String>) -> Self {
        Self {
            extractor,
            eligible,
        }
    }
}

impl Stage for ExtractStage {
    fn name(&self) -> &str {
        "extract"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), StageError> {
        let rewritten =
            self.extractor
                .process_document(&doc.content, &doc.extension, &self.eligible)?;
        if let Cow::Owned(content) = rewritten {
            doc.content = content;
        }
        Ok(())
    }
}

/// Expands highlight markers into HTML.
pub struct RenderStage {
    expander: MarkerExpander,
}

impl RenderStage {
    /// Create a stage rendering with `expander`.
    #[must_use]
    pub fn new(expander: MarkerExpander) -> Self {
        Self { expander }
    }
}

impl Default for RenderStage {
    fn default() -> Self {
        Self::new(MarkerExpander::default())
    }
}

impl Stage for RenderStage {
    fn name(&self) -> &str {
        "render"
    }

    fn apply(&self, doc: &mut Document) -> Result<(), StageError> {
        doc.content = self.expander.expand(&doc.content)?;
        Ok(())
    }
}
