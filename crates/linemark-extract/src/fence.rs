//! Code fence detection.
//!
//! Fences in `CommonMark` use backticks or tildes (three or more). The
//! closing fence must use the same character and be at least as long as the
//! opening fence. Either may be indented by at most three spaces; deeper
//! indentation makes the line part of an indented code block.

use crate::lines::Line;

/// An open code fence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fence {
    /// Character used for the fence (backtick or tilde).
    fence_char: char,
    /// Length of the opening fence (minimum length for closing).
    fence_len: usize,
}

/// Opening fence line split into its parts.
#[derive(Debug, PartialEq, Eq)]
pub struct OpenFence<'a> {
    /// The fence to match when closing.
    pub fence: Fence,
    /// Info string after the fence characters, surrounding whitespace removed.
    pub info: &'a str,
    /// Whether the fence was preceded by indentation.
    pub indented: bool,
}

impl Fence {
    /// Check if a line closes this fence.
    ///
    /// The closing fence must:
    /// - Use the same character as opening
    /// - Be at least as long as opening
    /// - Contain only fence characters (optionally followed by whitespace)
    /// - Be indented by at most three spaces
    #[must_use]
    pub fn is_closed_by(&self, line: &str) -> bool {
        let Some(trimmed) = strip_fence_indent(line) else {
            return false;
        };
        let count = trimmed.chars().take_while(|&c| c == self.fence_char).count();
        if count < self.fence_len {
            return false;
        }

        trimmed[count..].chars().all(char::is_whitespace)
    }

    /// Index of the first line at or after `from` that closes this fence.
    #[must_use]
    pub fn find_close(&self, lines: &[Line<'_>], from: usize) -> Option<usize> {
        lines
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, line)| self.is_closed_by(line.text))
            .map(|(idx, _)| idx)
    }
}

/// Detect if a line opens a code fence.
#[must_use]
pub fn detect_fence(line: &str) -> Option<OpenFence<'_>> {
    let trimmed = strip_fence_indent(line)?;
    let first = trimmed.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }

    let count = trimmed.chars().take_while(|&c| c == first).count();
    if count < 3 {
        return None;
    }

    let info = trimmed[count..].trim();
    // Backtick fences cannot carry backticks in their info string
    if first == '`' && info.contains('`') {
        return None;
    }

    Some(OpenFence {
        fence: Fence {
            fence_char: first,
            fence_len: count,
        },
        info,
        indented: trimmed.len() != line.len(),
    })
}

/// Strip up to three leading spaces, or `None` if the line is indented
/// further (or by a tab).
fn strip_fence_indent(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches(' ');
    if line.len() - rest.len() > 3 || rest.starts_with('\t') {
        return None;
    }
    Some(rest)
}
