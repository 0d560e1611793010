//! Ordered stage pipeline.

use crate::document::Document;
use crate::stage::{Stage, StageError};

/// Stages applied to every document, in order.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// Create an empty pipeline (documents pass through unchanged).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage.
    #[must_use]
    pub fn with_stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> impl Iterator<Item = &str> {
        self.stages.iter().map(|s| s.name())
    }

    /// Run every stage over `doc`, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first [`StageError`]; later stages do not run.
    pub fn run(&self, doc: &mut Document) -> Result<(), StageError> {
        for stage in &self.stages {
            tracing::trace!(path = %doc.path.display(), stage = stage.name(), "Applying stage");
            stage.apply(doc)?;
        }
        Ok(())
    }
}
