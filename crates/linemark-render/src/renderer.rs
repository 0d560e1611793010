//! Highlight request rendering.

use linemark_extract::RenderRequest;

use crate::escape::escape_html;
use crate::formatter::{FormatOptions, FormatterKind, format_tokens};
use crate::lexer::LexerRegistry;

/// Renders highlight requests to HTML.
///
/// # Example
///
/// ```
/// use linemark_extract::RenderRequest;
/// use linemark_render::Renderer;
///
/// let request = RenderRequest {
///     language: "python".to_owned(),
///     lines: [2].into_iter().collect(),
///     body: "a = 1\nb = 2\n".to_owned(),
///     gutter: false,
/// };
///
/// let html = Renderer::new().render(&request);
/// assert!(html.contains("a = 1\n<span class=\"hll\">b = 2\n</span>"));
/// ```
#[derive(Default)]
pub struct Renderer {
    registry: LexerRegistry,
    options: FormatOptions,
}

impl Renderer {
    /// Create a renderer with no lexers and default classes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a lexer registry for syntax highlighting.
    #[must_use]
    pub fn with_registry(mut self, registry: LexerRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Override CSS classes.
    #[must_use]
    pub fn with_options(mut self, options: FormatOptions) -> Self {
        self.options = options;
        self
    }

    /// Render one request.
    #[must_use]
    pub fn render(&self, request: &RenderRequest) -> String {
        let lexer = self.registry.find(&request.language);
        let lines: Vec<String> = lexer
            .lex(&request.body)
            .iter()
            .map(|tokens| format_tokens(tokens))
            .collect();

        let code = FormatterKind::chain(request)
            .into_iter()
            .fold(String::new(), |inner, formatter| {
                formatter.apply(&lines, inner, request, &self.options)
            });

        let language = escape_html(&request.language);
        format!(
            r#"<figure class="highlight"><pre><code class="language-{language}" data-lang="{language}">{code}</code></pre></figure>"#
        )
    }
}
