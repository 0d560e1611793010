//! Rendering error types.

use linemark_extract::MarkerError;

/// Error returned when highlight markers cannot be expanded.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Marker opening tag with unreadable attributes.
    #[error("line {line}: invalid highlight marker: {source}")]
    InvalidMarker {
        /// 1-based document line of the opening tag.
        line: usize,
        /// Attribute problem.
        #[source]
        source: MarkerError,
    },
    /// Marker without a matching end tag.
    #[error("line {line}: highlight marker has no matching end tag")]
    UnterminatedMarker {
        /// 1-based document line of the opening tag.
        line: usize,
    },
}
