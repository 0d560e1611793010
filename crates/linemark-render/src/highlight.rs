//! Syntax highlighting backed by syntect.
//!
//! Each syntax bundled with syntect becomes a [`Lexer`]. Scopes are mapped
//! onto the short CSS classes Rouge and Pygments emit (`k`, `s`, `c`, ...)
//! so existing highlight stylesheets apply unchanged.

use std::sync::{Arc, LazyLock};

use syntect::parsing::{ParseState, Scope, ScopeStack, SyntaxSet};

use crate::lexer::{Lexer, LexerRegistry, Token, TokenLine};

/// Scope prefixes and their classes, most specific first.
static SCOPE_CLASSES: LazyLock<Vec<(Scope, &'static str)>> = LazyLock::new(|| {
    [
        ("comment", "c"),
        ("string.regexp", "sr"),
        ("string", "s"),
        ("constant.character.escape", "se"),
        ("constant.numeric", "m"),
        ("constant.language", "kc"),
        ("constant", "no"),
        ("keyword.operator", "o"),
        ("keyword.control.import", "kn"),
        ("keyword", "k"),
        ("storage.type", "kt"),
        ("storage", "kd"),
        ("entity.name.function", "nf"),
        ("entity.name.class", "nc"),
        ("entity.name.type", "nc"),
        ("entity.name.tag", "nt"),
        ("entity.other.attribute-name", "na"),
        ("entity.name", "n"),
        ("support.function", "nb"),
        ("support.type", "kt"),
        ("support", "nb"),
        ("variable.language", "bp"),
        ("variable", "nv"),
    ]
    .into_iter()
    .map(|(scope, class)| (Scope::new(scope).unwrap(), class))
    .collect()
});

/// Lexer for one syntect syntax.
pub struct SyntectLexer {
    syntaxes: Arc<SyntaxSet>,
    syntax: String,
    name: String,
}

impl SyntectLexer {
    /// Tokenize one line (without terminator), advancing the parse state.
    fn lex_line<'a>(
        &self,
        line: &'a str,
        state: &mut ParseState,
        stack: &mut ScopeStack,
    ) -> Result<TokenLine<'a>, String> {
        // The bundled syntaxes expect newline-terminated input
        let terminated = format!("{line}\n");
        let ops = state
            .parse_line(&terminated, &self.syntaxes)
            .map_err(|e| format!("{e:?}"))?;

        let mut tokens = Vec::new();
        let mut start = 0;
        for (offset, op) in ops {
            let offset = offset.min(line.len());
            if offset > start {
                push_token(&mut tokens, line, start, offset, classify(stack));
                start = offset;
            }
            stack.apply(&op).map_err(|e| format!("{e:?}"))?;
        }
        if start < line.len() {
            push_token(&mut tokens, line, start, line.len(), classify(stack));
        }

        if tokens.is_empty() {
            tokens.push(Token {
                class: None,
                text: line,
            });
        }
        Ok(tokens)
    }
}

impl Lexer for SyntectLexer {
    fn name(&self) -> &str {
        &self.name
    }

    fn lex<'a>(&self, source: &'a str) -> Vec<TokenLine<'a>> {
        let Some(syntax) = self.syntaxes.find_syntax_by_name(&self.syntax) else {
            return source
                .lines()
                .map(|text| vec![Token { class: None, text }])
                .collect();
        };

        let mut state = ParseState::new(syntax);
        let mut stack = ScopeStack::new();
        let mut failed = false;

        source
            .lines()
            .map(|line| {
                if !failed {
                    match self.lex_line(line, &mut state, &mut stack) {
                        Ok(tokens) => return tokens,
                        Err(error) => {
                            tracing::debug!(
                                language = %self.name,
                                %error,
                                "Lexing failed, rest is plain text"
                            );
                            failed = true;
                        }
                    }
                }
                vec![Token {
                    class: None,
                    text: line,
                }]
            })
            .collect()
    }
}

/// Append `line[start..end]`, merging with the previous token of the same class.
fn push_token<'a>(
    tokens: &mut Vec<Token<'a>>,
    line: &'a str,
    start: usize,
    end: usize,
    class: Option<&'static str>,
) {
    if let Some(last) = tokens.last_mut()
        && last.class == class
    {
        last.text = &line[start - last.text.len()..end];
        return;
    }
    tokens.push(Token {
        class,
        text: &line[start..end],
    });
}

/// Class of the innermost scope with a known prefix.
fn classify(stack: &ScopeStack) -> Option<&'static str> {
    stack.as_slice().iter().rev().find_map(|&scope| {
        SCOPE_CLASSES
            .iter()
            .find(|(prefix, _)| prefix.is_prefix_of(scope))
            .map(|&(_, class)| class)
    })
}

impl LexerRegistry {
    /// Registry with a lexer for every syntax bundled with syntect.
    ///
    /// Lexers are registered under the lowercased syntax name and its file
    /// extensions (`python`, `py`, `rust`, `rs`, ...). Languages syntect does
    /// not know still fall back to plain text.
    #[must_use]
    pub fn syntect() -> Self {
        let syntaxes = Arc::new(SyntaxSet::load_defaults_newlines());
        let mut registry = Self::new();
        let mut count = 0usize;

        for syntax in syntaxes.syntaxes() {
            if syntax.name == "Plain Text" {
                continue;
            }
            let lexer = SyntectLexer {
                syntaxes: Arc::clone(&syntaxes),
                syntax: syntax.name.clone(),
                name: syntax.name.to_ascii_lowercase(),
            };
            registry.register(Box::new(lexer), &syntax.file_extensions);
            count += 1;
        }

        tracing::debug!(lexers = count, "Registered syntect lexers");
        registry
    }
}
