//! Marker expansion.
//!
//! Replaces every highlight marker in a document with rendered HTML. Text
//! outside markers, including ordinary fenced code blocks, is copied
//! unchanged.

use linemark_extract::fence::detect_fence;
use linemark_extract::{MarkerHeader, split_lines};

use crate::error::RenderError;
use crate::renderer::Renderer;

/// Expands highlight markers into HTML.
pub struct MarkerExpander {
    renderer: Renderer,
}

impl MarkerExpander {
    /// Create an expander rendering with `renderer`.
    #[must_use]
    pub fn new(renderer: Renderer) -> Self {
        Self { renderer }
    }

    /// Expand all markers in `input`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] for a marker with invalid attributes or
    /// without its end tag.
    pub fn expand(&self, input: &str) -> Result<String, RenderError> {
        let lines = split_lines(input);
        let mut output = String::with_capacity(input.len());
        let mut expanded = 0usize;
        let mut idx = 0;

        while idx < lines.len() {
            let line = lines[idx];

            if let Some(header) = MarkerHeader::parse(line.text) {
                let header = header.map_err(|source| RenderError::InvalidMarker {
                    line: idx + 1,
                    source,
                })?;
                let end = header
                    .locate_end(&lines, idx)
                    .ok_or(RenderError::UnterminatedMarker { line: idx + 1 })?;

                let body = &input[line.end()..lines[end].start];
                output.push_str(&self.renderer.render(&header.into_request(body)));
                output.push_str(lines[end].ending());
                expanded += 1;
                idx = end + 1;
                continue;
            }

            // Markers quoted inside ordinary fences stay literal
            let last = match detect_fence(line.text) {
                Some(open) => open
                    .fence
                    .find_close(&lines, idx + 1)
                    .unwrap_or(lines.len() - 1),
                None => idx,
            };
            output.push_str(&input[line.start..lines[last].end()]);
            idx = last + 1;
        }

        tracing::debug!(expanded, "Marker expansion completed");
        Ok(output)
    }
}

impl Default for MarkerExpander {
    fn default() -> Self {
        Self::new(Renderer::new())
    }
}
