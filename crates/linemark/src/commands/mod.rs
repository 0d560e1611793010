//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod extract;

pub(crate) use build::BuildArgs;
pub(crate) use extract::ExtractArgs;

use linemark_config::Config;
use linemark_extract::Extractor;
use linemark_render::{FormatOptions, LexerRegistry, MarkerExpander, Renderer};

/// Extractor configured from `[annotations]` and `[render]`.
fn extractor(config: &Config) -> Extractor {
    Extractor::new()
        .with_notation(config.annotations.notation)
        .with_line_numbers(config.render.line_numbers)
}

/// Marker expander configured from `[render]`, highlighting with syntect.
fn expander(config: &Config) -> MarkerExpander {
    let options = FormatOptions {
        highlight_class: config.render.highlight_class.clone(),
        ..FormatOptions::default()
    };
    let renderer = Renderer::new()
        .with_registry(LexerRegistry::syntect())
        .with_options(options);
    MarkerExpander::new(renderer)
}
