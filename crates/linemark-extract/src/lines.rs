//! Byte-exact line splitting.

/// One line of a document.
///
/// `text` excludes the line terminator, `raw` includes it. Concatenating the
/// `raw` slices of every line reproduces the input exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Line<'a> {
    /// Line content without `\n` or `\r\n`.
    pub text: &'a str,
    /// Line content including its terminator (if any).
    pub raw: &'a str,
    /// Byte offset of the line start in the source text.
    pub start: usize,
}

impl<'a> Line<'a> {
    /// The line terminator (`"\n"`, `"\r\n"` or `""` for a final line without one).
    #[must_use]
    pub fn ending(&self) -> &'a str {
        &self.raw[self.text.len()..]
    }

    /// Byte offset just past the terminator.
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.raw.len()
    }

    /// Check whether the line holds only whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Split text into lines without losing any bytes.
#[must_use]
pub fn split_lines(input: &str) -> Vec<Line<'_>> {
    let mut start = 0;
    input
        .split_inclusive('\n')
        .map(|raw| {
            let text = raw.strip_suffix('\n').unwrap_or(raw);
            let text = text.strip_suffix('\r').unwrap_or(text);
            let line = Line { text, raw, start };
            start += raw.len();
            line
        })
        .collect()
}
