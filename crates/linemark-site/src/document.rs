//! Document model.

use std::path::{Path, PathBuf};

/// A source document flowing through the pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// Path relative to the source directory.
    pub path: PathBuf,
    /// File extension without the leading dot, empty if none.
    pub extension: String,
    /// Current text, rewritten in place by each stage.
    pub content: String,
}

impl Document {
    /// Create a document, deriving the extension from `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let path = path.into();
        let extension = extension_of(&path);
        Self {
            path,
            extension,
            content: content.into(),
        }
    }
}

/// Extension of a path without the dot.
pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default()
}
