//! Extraction error types.

/// Error returned when a document cannot be preprocessed.
///
/// Any error aborts the whole document: no partial output is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    /// A token inside a line annotation is not a base-10 integer.
    #[error("line {line}: malformed line number {token:?} in highlight annotation")]
    MalformedLineSpec {
        /// The offending token, verbatim.
        token: String,
        /// 1-based document line holding the annotation.
        line: usize,
    },
}

/// Error returned by [`parse_line_spec`](crate::parse_line_spec).
///
/// Carries only the token; callers attach the document position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed line number {token:?}")]
pub struct LineSpecError {
    /// The offending token, verbatim.
    pub token: String,
}

impl LineSpecError {
    /// Attach a document line number.
    #[must_use]
    pub fn at_line(self, line: usize) -> ExtractError {
        ExtractError::MalformedLineSpec {
            token: self.token,
            line,
        }
    }
}

/// Error returned when a highlight marker header cannot be read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkerError {
    /// Attribute name not understood by this marker dialect.
    #[error("unknown marker attribute {0:?}")]
    UnknownAttribute(String),
    /// `body_lines` attribute is missing a value or not an integer.
    #[error("invalid body_lines value {0:?}")]
    InvalidBodyLines(String),
    /// `mark_lines` attribute holds a malformed line list.
    #[error("invalid mark_lines value: {0}")]
    InvalidMarkLines(#[from] LineSpecError),
}
