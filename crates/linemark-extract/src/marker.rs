//! Highlight marker syntax.
//!
//! The extractor replaces every annotated code block with a marker that a
//! later rendering stage expands:
//!
//! ```text
//! {% highlight python mark_lines="1 3" body_lines="2" %}
//! def greet():
//!     return "hi"
//! {% endhighlight %}
//! ```
//!
//! - `mark_lines`: space-separated ascending line numbers, possibly empty
//! - `linenos`: flag requesting a line-number gutter
//! - `body_lines`: number of body lines, so the end tag is found by count
//!   even when the body itself contains a literal end tag line
//!
//! Marker lines never look like a fence or a `{…}` annotation line, so
//! running the extractor over its own output changes nothing.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::MarkerError;
use crate::line_spec::{HighlightLineSet, parse_line_spec};
use crate::lines::Line;

/// Closing line of every marker.
pub const END_TAG: &str = "{% endhighlight %}";

static OPEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\{%\s*highlight\s+([A-Za-z0-9_+-]+)((?:\s+[a-z_]+(?:="[^"]*")?)*)\s*%\}\s*$"#)
        .unwrap()
});

static ATTR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([a-z_]+)(?:="([^"]*)")?"#).unwrap());

/// Structured highlight request handed to the rendering stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderRequest {
    /// Language identifier from the fence.
    pub language: String,
    /// Lines to emphasize (1-based, relative to the body).
    pub lines: HighlightLineSet,
    /// Code between the fences, line terminators included.
    pub body: String,
    /// Whether a line-number gutter is requested.
    pub gutter: bool,
}

impl RenderRequest {
    /// Append this request as a marker.
    ///
    /// `newline` terminates the opening tag; `trailing` follows the end tag
    /// and is usually the closing fence's own terminator.
    pub fn write_marker(&self, out: &mut String, newline: &str, trailing: &str) {
        write!(
            out,
            r#"{{% highlight {} mark_lines="{}""#,
            self.language, self.lines
        )
        .unwrap();
        if self.gutter {
            out.push_str(" linenos");
        }
        write!(out, r#" body_lines="{}" %}}{newline}"#, count_lines(&self.body)).unwrap();
        out.push_str(&self.body);
        out.push_str(END_TAG);
        out.push_str(trailing);
    }
}

/// Parsed marker opening tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkerHeader {
    /// Language identifier.
    pub language: String,
    /// Lines to emphasize; empty when `mark_lines` is absent.
    pub lines: HighlightLineSet,
    /// Whether the `linenos` flag was present.
    pub gutter: bool,
    /// Declared body length, if any.
    pub body_lines: Option<usize>,
}

impl MarkerHeader {
    /// Parse a marker opening tag.
    ///
    /// Returns `None` if the line is not a marker opener at all, and
    /// `Some(Err(_))` if it is one with unreadable attributes.
    #[must_use]
    pub fn parse(line: &str) -> Option<Result<Self, MarkerError>> {
        let caps = OPEN_PATTERN.captures(line)?;
        let language = caps[1].to_owned();
        let attrs = caps.get(2).map_or("", |m| m.as_str());
        Some(parse_attrs(language, attrs))
    }

    /// Index of the end tag line for a marker opened at `open`.
    ///
    /// With a declared `body_lines` the end tag must sit exactly after that
    /// many lines; otherwise the first end tag line wins.
    #[must_use]
    pub fn locate_end(&self, lines: &[Line<'_>], open: usize) -> Option<usize> {
        match self.body_lines {
            Some(count) => {
                let idx = open + 1 + count;
                lines
                    .get(idx)
                    .is_some_and(|line| is_end_tag(line.text))
                    .then_some(idx)
            }
            None => lines
                .iter()
                .enumerate()
                .skip(open + 1)
                .find(|(_, line)| is_end_tag(line.text))
                .map(|(idx, _)| idx),
        }
    }

    /// Combine with the marker body into a render request.
    #[must_use]
    pub fn into_request(self, body: impl Into<String>) -> RenderRequest {
        RenderRequest {
            language: self.language,
            lines: self.lines,
            body: body.into(),
            gutter: self.gutter,
        }
    }
}

fn parse_attrs(language: String, attrs: &str) -> Result<MarkerHeader, MarkerError> {
    let mut header = MarkerHeader {
        language,
        lines: HighlightLineSet::new(),
        gutter: false,
        body_lines: None,
    };

    for caps in ATTR_PATTERN.captures_iter(attrs) {
        let value = caps.get(2).map(|m| m.as_str());
        match (&caps[1], value) {
            ("mark_lines", Some(value)) => header.lines = parse_line_spec(value)?,
            ("linenos", _) => header.gutter = true,
            ("body_lines", Some(value)) => {
                let count = value
                    .parse()
                    .map_err(|_| MarkerError::InvalidBodyLines(value.to_owned()))?;
                header.body_lines = Some(count);
            }
            ("body_lines", None) => return Err(MarkerError::InvalidBodyLines(String::new())),
            (name, _) => return Err(MarkerError::UnknownAttribute(name.to_owned())),
        }
    }

    Ok(header)
}

/// Check if a line is the marker end tag.
#[must_use]
pub fn is_end_tag(line: &str) -> bool {
    line.trim_end() == END_TAG
}

fn count_lines(body: &str) -> usize {
    body.split_inclusive('\n').count()
}
