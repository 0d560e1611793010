//! Highlight marker expansion with line-highlight and gutter formatters.
//!
//! This crate is the rendering stage for markers produced by
//! `linemark-extract`. Formatting is split into independent strategies
//! (see [`FormatterKind`]):
//!
//! - **Plain**: escaped code, one line per row
//! - **Line-highlighted**: selected 1-based lines wrapped in a highlight span
//! - **Table gutter**: the above placed next to a line-number column
//!
//! Tokenization is pluggable through [`LexerRegistry`].
//! [`LexerRegistry::syntect`] registers a lexer for every syntax bundled with
//! syntect; unknown languages render as plain text.
//!
//! # Example
//!
//! ```
//! use linemark_extract::Extractor;
//! use linemark_render::MarkerExpander;
//!
//! let marked = Extractor::new()
//!     .process("{1}\n```rust\nfn main() {}\n```\n")
//!     .unwrap();
//! let html = MarkerExpander::default().expand(&marked).unwrap();
//!
//! assert!(html.contains(r#"<span class="hll">fn main() {}"#));
//! ```

mod error;
mod escape;
mod expander;
mod formatter;
mod highlight;
mod lexer;
mod renderer;

pub use error::RenderError;
pub use escape::escape_html;
pub use expander::MarkerExpander;
pub use formatter::{
    FormatOptions, FormatterKind, format_tokens, line_highlighted, plain, table_gutter,
};
pub use highlight::SyntectLexer;
pub use lexer::{Lexer, LexerRegistry, PlainText, Token, TokenLine};
pub use renderer::Renderer;
