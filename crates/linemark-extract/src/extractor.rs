//! Annotated code block extraction.
//!
//! Converts line-highlight annotations on fenced code blocks into highlight
//! markers (see [`crate::marker`]). Two notations are recognized:
//!
//! ````markdown
//! {1 3}
//!
//! ```python
//! print("one")
//! print("two")
//! print("three")
//! ```
//! ````
//!
//! and the same request attached to the fence itself: `` ```python{1 3} ``.

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ExtractError;
use crate::fence::detect_fence;
use crate::line_spec::parse_line_spec;
use crate::lines::{Line, split_lines};
use crate::marker::{MarkerHeader, RenderRequest};

/// A line that is only `{…}`, used before a fence. Liquid tags (`{% … %}`)
/// and kramdown attribute lists (`{: .note}`) never qualify.
static ANNOTATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{([^{}%:][^{}%]*)?\}\s*$").unwrap());

/// Fence info string holding a bare language identifier.
static LANGUAGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_+-]+$").unwrap());

/// Fence info string with the annotation glued to the language.
static SUFFIX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_+-]+)\{([^{}]*)\}$").unwrap());

/// Which annotation notations are recognized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Notation {
    /// `{1 3}` on its own line before the fence.
    Prefix,
    /// `` ```lang{1 3} `` on the fence line.
    Suffix,
    /// Both of the above.
    #[default]
    Both,
}

impl Notation {
    fn prefix(self) -> bool {
        matches!(self, Self::Prefix | Self::Both)
    }

    fn suffix(self) -> bool {
        matches!(self, Self::Suffix | Self::Both)
    }
}

/// Extractor for line-highlight annotations.
///
/// A single left-to-right sweep over the document. Matches never overlap:
/// once a block is consumed, scanning resumes after its closing fence.
/// Unannotated fences and existing markers are copied verbatim without
/// looking inside them, which keeps the transformation idempotent.
///
/// # Example
///
/// ```
/// use linemark_extract::Extractor;
///
/// let output = Extractor::new()
///     .process("{1 3}\n```python\na = 1\nb = 2\n```\n")
///     .unwrap();
///
/// assert!(output.starts_with(r#"{% highlight python mark_lines="1 3""#));
/// assert!(output.contains("a = 1\nb = 2\n{% endhighlight %}"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Extractor {
    notation: Notation,
    line_numbers: bool,
}

impl Extractor {
    /// Create an extractor recognizing both notations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict recognition to one notation.
    #[must_use]
    pub fn with_notation(mut self, notation: Notation) -> Self {
        self.notation = notation;
        self
    }

    /// Request a line-number gutter on every extracted block.
    ///
    /// Blocks with an empty annotation (`{}`) always request one.
    #[must_use]
    pub fn with_line_numbers(mut self, enabled: bool) -> Self {
        self.line_numbers = enabled;
        self
    }

    /// Transform a document whose extension may or may not be eligible.
    ///
    /// `extension` may carry a leading dot. Documents whose extension is not
    /// in `eligible` are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError`] as [`Extractor::process`] does.
    pub fn process_document<'a>(
        &self,
        input: &'a str,
        extension: &str,
        eligible: &HashSet<String>,
    ) -> Result<Cow<'a, str>, ExtractError> {
        if !is_eligible(extension, eligible) {
            tracing::trace!(extension, "Skipping ineligible document");
            return Ok(Cow::Borrowed(input));
        }
        self.process(input).map(Cow::Owned)
    }

    /// Transform every annotated code block in `input`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::MalformedLineSpec`] if any recognized
    /// annotation holds a token that is not an integer. No output is
    /// produced in that case.
    pub fn process(&self, input: &str) -> Result<String, ExtractError> {
        let mut pass = Pass {
            extractor: self,
            input,
            lines: split_lines(input),
            output: String::with_capacity(input.len()),
            blocks: 0,
        };

        let mut idx = 0;
        while idx < pass.lines.len() {
            idx = pass.step(idx)?;
        }

        tracing::debug!(blocks = pass.blocks, "Annotation extraction completed");
        Ok(pass.output)
    }
}

/// Check a document extension against the eligible set.
#[must_use]
pub fn is_eligible(extension: &str, eligible: &HashSet<String>) -> bool {
    eligible.contains(extension.trim_start_matches('.'))
}

/// Transform a document with the default extractor.
///
/// Shorthand for [`Extractor::process_document`] with both notations enabled
/// and no forced gutter.
///
/// # Errors
///
/// Returns [`ExtractError`] for a malformed annotation.
pub fn extract<'a>(
    input: &'a str,
    extension: &str,
    eligible: &HashSet<String>,
) -> Result<Cow<'a, str>, ExtractError> {
    Extractor::new().process_document(input, extension, eligible)
}

/// State for one sweep over a document.
struct Pass<'a, 'e> {
    extractor: &'e Extractor,
    input: &'a str,
    lines: Vec<Line<'a>>,
    output: String,
    blocks: usize,
}

impl Pass<'_, '_> {
    /// Consume the construct starting at `idx` and return the next index.
    fn step(&mut self, idx: usize) -> Result<usize, ExtractError> {
        let line = self.lines[idx];

        // Existing markers are opaque
        if let Some(Ok(header)) = MarkerHeader::parse(line.text)
            && let Some(end) = header.locate_end(&self.lines, idx)
        {
            return Ok(self.copy_through(idx, end));
        }

        if self.extractor.notation.prefix()
            && let Some(caps) = ANNOTATION_PATTERN.captures(line.text)
        {
            let spec = caps.get(1).map_or("", |m| m.as_str());
            if let Some(next) = self.match_prefix(idx, spec)? {
                return Ok(next);
            }
            return Ok(self.copy_through(idx, idx));
        }

        if let Some(open) = detect_fence(line.text) {
            let close = open.fence.find_close(&self.lines, idx + 1);

            if self.extractor.notation.suffix()
                && !open.indented
                && let Some(close) = close
                && let Some(caps) = SUFFIX_PATTERN.captures(open.info)
            {
                let language = caps.get(1).map_or("", |m| m.as_str());
                let spec = caps.get(2).map_or("", |m| m.as_str());
                self.emit(idx, idx, close, language, spec)?;
                return Ok(close + 1);
            }

            // Ordinary fence, or unterminated one running to the end
            let last = close.unwrap_or(self.lines.len() - 1);
            return Ok(self.copy_through(idx, last));
        }

        Ok(self.copy_through(idx, idx))
    }

    /// Try to match a prefix annotation at `idx` against the following fence.
    fn match_prefix(&mut self, idx: usize, spec: &str) -> Result<Option<usize>, ExtractError> {
        let Some(open_idx) = (idx + 1..self.lines.len()).find(|&i| !self.lines[i].is_blank())
        else {
            return Ok(None);
        };

        let Some(open) = detect_fence(self.lines[open_idx].text) else {
            return Ok(None);
        };
        if open.indented || !LANGUAGE_PATTERN.is_match(open.info) {
            return Ok(None);
        }
        let Some(close) = open.fence.find_close(&self.lines, open_idx + 1) else {
            return Ok(None);
        };

        self.emit(idx, open_idx, close, open.info, spec)?;
        Ok(Some(close + 1))
    }

    /// Replace lines `annotation..=close` with a marker.
    fn emit(
        &mut self,
        annotation: usize,
        open: usize,
        close: usize,
        language: &str,
        spec: &str,
    ) -> Result<(), ExtractError> {
        let lines = parse_line_spec(spec).map_err(|e| e.at_line(annotation + 1))?;
        let gutter = self.extractor.line_numbers || lines.is_empty();
        let body = &self.input[self.lines[open].end()..self.lines[close].start];

        tracing::debug!(
            language,
            line = annotation + 1,
            highlighted = lines.len(),
            gutter,
            "Extracted annotated code block"
        );

        let request = RenderRequest {
            language: language.to_owned(),
            lines,
            body: body.to_owned(),
            gutter,
        };
        request.write_marker(
            &mut self.output,
            self.lines[open].ending(),
            self.lines[close].ending(),
        );
        self.blocks += 1;
        Ok(())
    }

    /// Copy lines `from..=to` unchanged and return the index after them.
    fn copy_through(&mut self, from: usize, to: usize) -> usize {
        let start = self.lines[from].start;
        let end = self.lines[to].end();
        self.output.push_str(&self.input[start..end]);
        to + 1
    }
}
