//! Colored terminal output utilities.

use std::path::Path;

use console::{Style, Term};
use linemark_site::{BuildReport, FileOutcome};

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    dim: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            dim: Style::new().dim(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print one line per file, failures in red, then a summary.
    pub(crate) fn build_report(&self, report: &BuildReport, output_dir: &Path) {
        for file in &report.files {
            match &file.result {
                Ok(FileOutcome::Processed) => self.info(&format!("  {}", file.path.display())),
                Ok(FileOutcome::Copied) => {
                    let line = format!("  {} (copied)", file.path.display());
                    let _ = self.term.write_line(&self.dim.apply_to(line).to_string());
                }
                Err(err) => self.error(&format!("  {err}")),
            }
        }

        if report.files.is_empty() {
            self.warning("No files found");
        } else if report.is_success() {
            self.success(&format!(
                "Processed {} documents, copied {} files to {}",
                report.processed(),
                report.copied(),
                output_dir.display()
            ));
        }
    }
}
