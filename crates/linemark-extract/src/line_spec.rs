//! Line-number lists from highlight annotations.
//!
//! The annotation dialect is a whitespace-separated list of base-10 integers
//! (`{1 3 10}`). Commas are not separators: `1,3` is a single malformed token.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::LineSpecError;

/// Set of 1-based, body-relative line numbers to emphasize.
///
/// Duplicates collapse and iteration is ascending, so the serialized form
/// is stable. An empty set is a valid request ("show the gutter, highlight
/// nothing") and is distinct from having no annotation at all.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightLineSet(BTreeSet<u32>);

impl HighlightLineSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a 1-based line number is highlighted.
    #[must_use]
    pub fn contains(&self, line: u32) -> bool {
        self.0.contains(&line)
    }

    /// Check whether no lines are highlighted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct highlighted lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate line numbers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<u32> for HighlightLineSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Space-joined ascending list, the inverse of [`parse_line_spec`].
impl fmt::Display for HighlightLineSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Parse the content of a highlight annotation into a line set.
///
/// Splits on runs of whitespace. Every token must consist of ASCII digits
/// only and fit in a `u32`; the first token that does not is reported and
/// nothing is returned. Blank input yields an empty set.
///
/// # Examples
///
/// ```
/// use linemark_extract::parse_line_spec;
///
/// let lines = parse_line_spec("1 3 3 10").unwrap();
/// assert_eq!(lines.iter().collect::<Vec<_>>(), vec![1, 3, 10]);
///
/// let err = parse_line_spec("1 x 3").unwrap_err();
/// assert_eq!(err.token, "x");
/// ```
pub fn parse_line_spec(raw: &str) -> Result<HighlightLineSet, LineSpecError> {
    raw.split_whitespace().map(parse_token).collect()
}

fn parse_token(token: &str) -> Result<u32, LineSpecError> {
    let malformed = || LineSpecError {
        token: token.to_owned(),
    };

    // `u32::from_str` would also accept a leading `+`
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    token.parse().map_err(|_| malformed())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(set: &HighlightLineSet) -> Vec<u32> {
        set.iter().collect()
    }

    #[test]
    fn test_parse_simple() {
        let set = parse_line_spec("1 3").unwrap();
        assert_eq!(lines(&set), vec![1, 3]);
    }

    #[test]
    fn test_parse_duplicates_collapse() {
        let set = parse_line_spec("1 3 3 10").unwrap();
        assert_eq!(lines(&set), vec![1, 3, 10]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_parse_unordered_input() {
        let set = parse_line_spec("10 2 7").unwrap();
        assert_eq!(lines(&set), vec![2, 7, 10]);
    }

    #[test]
    fn test_parse_mixed_whitespace() {
        let set = parse_line_spec("  4\t5 \n 6  ").unwrap();
        assert_eq!(lines(&set), vec![4, 5, 6]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_line_spec("").unwrap().is_empty());
        assert!(parse_line_spec("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_malformed_names_token() {
        let err = parse_line_spec("1 x 3").unwrap_err();
        assert_eq!(err.token, "x");
        assert!(err.to_string().contains("\"x\""));
    }

    #[test]
    fn test_parse_comma_is_not_separator() {
        let err = parse_line_spec("1,3").unwrap_err();
        assert_eq!(err.token, "1,3");
    }

    #[test]
    fn test_parse_rejects_signs() {
        assert_eq!(parse_line_spec("+3").unwrap_err().token, "+3");
        assert_eq!(parse_line_spec("-1").unwrap_err().token, "-1");
    }

    #[test]
    fn test_parse_overflow_is_malformed() {
        let err = parse_line_spec("99999999999").unwrap_err();
        assert_eq!(err.token, "99999999999");
    }

    #[test]
    fn test_parse_zero_accepted() {
        let set = parse_line_spec("0 2").unwrap();
        assert!(set.contains(0));
        assert!(set.contains(2));
    }

    #[test]
    fn test_display_round_trip() {
        let set = parse_line_spec("5 1 3 3").unwrap();
        assert_eq!(set.to_string(), "1 3 5");
        assert_eq!(parse_line_spec(&set.to_string()).unwrap(), set);
    }

    #[test]
    fn test_display_empty() {
        assert_eq!(HighlightLineSet::new().to_string(), "");
    }
}
