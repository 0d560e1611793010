//! Output formatters.
//!
//! Each formatter is a pure function over already tokenized lines. The
//! renderer picks a chain with [`FormatterKind::chain`] and folds it:
//! a line-level formatter produces the code markup, and
//! [`FormatterKind::TableGutter`] optionally wraps that markup in a table
//! with a line-number column.

use std::fmt::Write;

use linemark_extract::{HighlightLineSet, RenderRequest};

use crate::escape::escape_html;
use crate::lexer::Token;

/// CSS classes used in rendered markup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatOptions {
    /// Class wrapping highlighted lines.
    pub highlight_class: String,
    /// Class of the gutter table.
    pub table_class: String,
    /// Class of the line-number cell.
    pub gutter_class: String,
    /// Class of the code cell.
    pub code_class: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            highlight_class: "hll".to_owned(),
            table_class: "rouge-table".to_owned(),
            gutter_class: "gutter gl".to_owned(),
            code_class: "code".to_owned(),
        }
    }
}

/// Formatting strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatterKind {
    /// Lines as-is.
    Plain,
    /// Lines in the highlight set wrapped in a highlight span.
    LineHighlighted,
    /// Inner markup placed next to a 1-based line-number column.
    TableGutter,
}

impl FormatterKind {
    /// Formatters to apply for a request, innermost first.
    #[must_use]
    pub fn chain(request: &RenderRequest) -> Vec<Self> {
        let mut chain = Vec::with_capacity(2);
        chain.push(if request.lines.is_empty() {
            Self::Plain
        } else {
            Self::LineHighlighted
        });
        if request.gutter {
            chain.push(Self::TableGutter);
        }
        chain
    }

    /// Apply this formatter.
    ///
    /// `lines` holds the formatted tokens of each source line; `inner` is the
    /// output of the previous formatter in the chain (ignored by line-level
    /// formatters).
    #[must_use]
    pub fn apply(
        self,
        lines: &[String],
        inner: String,
        request: &RenderRequest,
        options: &FormatOptions,
    ) -> String {
        match self {
            Self::Plain => plain(lines),
            Self::LineHighlighted => {
                line_highlighted(lines, &request.lines, &options.highlight_class)
            }
            Self::TableGutter => table_gutter(&inner, lines.len(), options),
        }
    }
}

/// Format the tokens of one line (without terminator).
#[must_use]
pub fn format_tokens(tokens: &[Token<'_>]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token.class {
            Some(class) => write!(
                out,
                r#"<span class="{}">{}</span>"#,
                escape_html(class),
                escape_html(token.text)
            )
            .unwrap(),
            None => out.push_str(&escape_html(token.text)),
        }
    }
    out
}

/// Join lines, each terminated by `\n`.
#[must_use]
pub fn plain(lines: &[String]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Join lines, wrapping those whose 1-based number is in `highlighted`.
///
/// The terminator of a highlighted line sits inside its span so the
/// highlight covers the full row.
#[must_use]
pub fn line_highlighted(lines: &[String], highlighted: &HighlightLineSet, class: &str) -> String {
    let mut out = String::new();
    for (number, line) in (1u32..).zip(lines) {
        if highlighted.contains(number) {
            write!(out, r#"<span class="{}">{line}"#, escape_html(class)).unwrap();
            out.push_str("\n</span>");
        } else {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

/// Place `inner` next to a column numbering `line_count` lines from 1.
#[must_use]
pub fn table_gutter(inner: &str, line_count: usize, options: &FormatOptions) -> String {
    let mut numbers = String::new();
    for number in 1..=line_count {
        writeln!(numbers, "{number}").unwrap();
    }

    format!(
        r#"<table class="{}"><tbody><tr><td class="{}"><pre class="lineno">{numbers}</pre></td><td class="{}"><pre>{inner}</pre></td></tr></tbody></table>"#,
        escape_html(&options.table_class),
        escape_html(&options.gutter_class),
        escape_html(&options.code_class),
    )
}
