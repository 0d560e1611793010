//! `linemark extract` command implementation.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use linemark_config::Config;
use linemark_extract::is_eligible;

use crate::error::CliError;

/// Arguments for the extract command.
#[derive(Args)]
pub(crate) struct ExtractArgs {
    /// Document to process.
    file: PathBuf,

    /// Expand highlight markers into HTML as well.
    #[arg(long)]
    render: bool,

    /// Path to configuration file (default: auto-discover linemark.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ExtractArgs {
    /// Execute the extract command, writing the result to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or holds a malformed
    /// annotation.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), None)?;
        let content = std::fs::read_to_string(&self.file)?;
        let extension = self
            .file
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();

        let result = transform(&config, &content, &extension, self.render)?;
        tracing::info!(file = %self.file.display(), "Document processed");

        let mut stdout = io::stdout().lock();
        stdout.write_all(result.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

/// Run a document through extraction and, if requested, rendering.
///
/// Documents with an ineligible extension are returned unchanged, as
/// `linemark build` copies them.
fn transform(
    config: &Config,
    content: &str,
    extension: &str,
    render: bool,
) -> Result<String, CliError> {
    let eligible = config.markdown.eligible();
    if !is_eligible(extension, &eligible) {
        return Ok(content.to_owned());
    }

    let extracted = super::extractor(config).process(content)?;
    if render {
        Ok(super::expander(config).expand(&extracted)?)
    } else {
        Ok(extracted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_transform_extract_only() {
        let out = transform(&Config::default(), "{1}\n```sh\nls\n```\n", "md", false).unwrap();
        assert_eq!(
            out,
            "{% highlight sh mark_lines=\"1\" body_lines=\"1\" %}\nls\n{% endhighlight %}\n"
        );
    }

    #[test]
    fn test_transform_render() {
        let out = transform(&Config::default(), "{1}\n```sh\nls\n```\n", "md", true).unwrap();
        assert!(out.starts_with("<figure class=\"highlight\">"));
        assert!(out.contains("<span class=\"hll\">"));
    }

    #[test]
    fn test_transform_ineligible_not_rendered() {
        let input = "{% highlight sh %}\nls\n{% endhighlight %}\n";
        assert_eq!(transform(&Config::default(), input, "txt", true).unwrap(), input);
        assert_eq!(transform(&Config::default(), input, "", true).unwrap(), input);
    }
}
