//! CLI error types.

use linemark_config::ConfigError;
use linemark_extract::ExtractError;
use linemark_render::RenderError;
use linemark_site::BuildError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Extract(#[from] ExtractError),

    #[error("{0}")]
    Render(#[from] RenderError),

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("{failed} of {total} files failed")]
    Failed { failed: usize, total: usize },
}
