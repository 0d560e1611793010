//! `linemark build` command implementation.

use std::path::PathBuf;

use clap::Args;
use linemark_config::{CliSettings, Config};
use linemark_site::{ExtractStage, Pipeline, RenderStage, SiteBuilder};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover linemark.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output directory (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Add a line-number gutter to every annotated block.
    #[arg(long)]
    line_numbers: bool,

    /// Stop after extraction and write highlight markers instead of HTML.
    #[arg(long)]
    extract_only: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the source directory is
    /// missing, or any document fails to build.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            line_numbers: self.line_numbers.then_some(true),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let build = &config.build_resolved;

        output.info(&format!("Source: {}", build.source_dir.display()));
        output.info(&format!("Output: {}", build.output_dir.display()));

        let eligible = config.markdown.eligible();
        let extract = ExtractStage::new(super::extractor(&config), eligible.clone());
        let mut pipeline = Pipeline::new().with_stage(extract);
        if !self.extract_only {
            pipeline = pipeline.with_stage(RenderStage::new(super::expander(&config)));
        }

        let builder = SiteBuilder::new(
            build.source_dir.clone(),
            build.output_dir.clone(),
            pipeline,
            eligible,
        );
        let report = builder.build()?;

        output.build_report(&report, &build.output_dir);

        let failed = report.failures().count();
        if failed > 0 {
            return Err(CliError::Failed {
                failed,
                total: report.files.len(),
            });
        }
        Ok(())
    }
}
