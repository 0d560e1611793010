//! Source tokenization.
//!
//! Syntax highlighting is delegated to lexers registered in a
//! [`LexerRegistry`] (see [`LexerRegistry::syntect`]). Languages without a
//! registered lexer fall back to [`PlainText`], which emits one unclassified
//! token per line.

use std::collections::HashMap;

/// A run of source text with an optional CSS class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    /// CSS class for the token, `None` for unstyled text.
    pub class: Option<&'static str>,
    /// Token text, never containing a line terminator.
    pub text: &'a str,
}

/// Tokens of one source line.
pub type TokenLine<'a> = Vec<Token<'a>>;

/// Splits source code into classified tokens, line by line.
pub trait Lexer: Send + Sync {
    /// Canonical language name.
    fn name(&self) -> &str;

    /// Tokenize `source`. Must return exactly one entry per source line.
    fn lex<'a>(&self, source: &'a str) -> Vec<TokenLine<'a>>;
}

/// Fallback lexer: one plain token per line.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainText;

impl Lexer for PlainText {
    fn name(&self) -> &str {
        "plaintext"
    }

    fn lex<'a>(&self, source: &'a str) -> Vec<TokenLine<'a>> {
        source
            .lines()
            .map(|text| vec![Token { class: None, text }])
            .collect()
    }
}

static PLAIN_TEXT: PlainText = PlainText;

/// Lexers keyed by language alias.
///
/// Lookup is ASCII case-insensitive. Unknown languages resolve to
/// [`PlainText`] rather than failing.
#[derive(Default)]
pub struct LexerRegistry {
    lexers: Vec<Box<dyn Lexer>>,
    aliases: HashMap<String, usize>,
}

impl LexerRegistry {
    /// Create a registry with no lexers (everything renders as plain text).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a lexer under its name and additional aliases.
    pub fn register<I, S>(&mut self, lexer: Box<dyn Lexer>, aliases: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let index = self.lexers.len();
        self.aliases.insert(lexer.name().to_ascii_lowercase(), index);
        for alias in aliases {
            self.aliases.insert(alias.as_ref().to_ascii_lowercase(), index);
        }
        self.lexers.push(lexer);
    }

    /// Find the lexer for a language, falling back to plain text.
    #[must_use]
    pub fn find(&self, language: &str) -> &dyn Lexer {
        match self.aliases.get(&language.to_ascii_lowercase()) {
            Some(&index) => self.lexers[index].as_ref(),
            None => {
                tracing::trace!(language, "No lexer registered, using plain text");
                &PLAIN_TEXT
            }
        }
    }
}
