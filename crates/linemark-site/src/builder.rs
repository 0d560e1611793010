//! Parallel site build.
//!
//! Every file under the source directory is mirrored into the output
//! directory. Eligible documents go through the [`Pipeline`]; everything
//! else is copied byte for byte. Documents are independent, so they are
//! processed on the global rayon thread pool and a failure in one never
//! affects another.

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use linemark_extract::is_eligible;
use rayon::prelude::*;

use crate::document::{Document, extension_of};
use crate::pipeline::Pipeline;
use crate::scanner::Scanner;
use crate::stage::StageError;

/// Error building the site or one of its files.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Source directory does not exist.
    #[error("Source directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    /// Output directory is the source directory or one of its parents.
    #[error("Output directory {} would overwrite the source directory", .0.display())]
    OutputOverlapsSource(PathBuf),
    /// Reading or writing a file failed.
    #[error("{}: {source}", path.display())]
    Io {
        /// File being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A pipeline stage rejected the document.
    #[error("{}: {source}", path.display())]
    Stage {
        /// Document path relative to the source directory.
        path: PathBuf,
        /// Stage failure.
        #[source]
        source: StageError,
    },
}

/// What happened to a file that built successfully.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileOutcome {
    /// Ran through the pipeline.
    Processed,
    /// Copied unchanged.
    Copied,
}

/// Result for one file.
#[derive(Debug)]
pub struct FileReport {
    /// Path relative to the source directory.
    pub path: PathBuf,
    /// Outcome or failure.
    pub result: Result<FileOutcome, BuildError>,
}

/// Per-file results of a build, sorted by path.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// One entry per source file.
    pub files: Vec<FileReport>,
}

impl BuildReport {
    /// Number of files that ran through the pipeline.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.count(FileOutcome::Processed)
    }

    /// Number of files copied unchanged.
    #[must_use]
    pub fn copied(&self) -> usize {
        self.count(FileOutcome::Copied)
    }

    /// Failed files with their errors.
    pub fn failures(&self) -> impl Iterator<Item = &BuildError> {
        self.files.iter().filter_map(|f| f.result.as_ref().err())
    }

    /// Whether every file built.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    fn count(&self, outcome: FileOutcome) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.result, Ok(o) if o == outcome))
            .count()
    }
}

/// Builds a source tree into an output tree.
pub struct SiteBuilder {
    source_dir: PathBuf,
    output_dir: PathBuf,
    pipeline: Pipeline,
    eligible: HashSet<String>,
}

impl SiteBuilder {
    /// Create a builder.
    ///
    /// `eligible` lists the extensions (without dot) of documents run
    /// through `pipeline`.
    #[must_use]
    pub fn new(
        source_dir: PathBuf,
        output_dir: PathBuf,
        pipeline: Pipeline,
        eligible: HashSet<String>,
    ) -> Self {
        Self {
            source_dir,
            output_dir,
            pipeline,
            eligible,
        }
    }

    /// Build every file.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::SourceNotFound`] if the source directory is
    /// missing and [`BuildError::OutputOverlapsSource`] if writing the
    /// output would replace source files. Per-file failures are collected
    /// in the report instead.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        if !self.source_dir.is_dir() {
            return Err(BuildError::SourceNotFound(self.source_dir.clone()));
        }
        let source = resolve_dir(&self.source_dir);
        if source.starts_with(resolve_dir(&self.output_dir)) {
            return Err(BuildError::OutputOverlapsSource(self.output_dir.clone()));
        }

        let files = Scanner::new(self.source_dir.clone())
            .excluding(self.output_dir.clone())
            .scan();
        tracing::info!(
            source = %self.source_dir.display(),
            output = %self.output_dir.display(),
            files = files.len(),
            stages = ?self.pipeline.stage_names().collect::<Vec<_>>(),
            "Building site"
        );

        let files: Vec<FileReport> = files
            .par_iter()
            .map(|path| FileReport {
                path: path.clone(),
                result: self.build_file(path),
            })
            .collect();

        let report = BuildReport { files };
        tracing::info!(
            processed = report.processed(),
            copied = report.copied(),
            failed = report.failures().count(),
            "Site build completed"
        );
        Ok(report)
    }

    /// Build one file given relative to the source directory.
    fn build_file(&self, relative: &Path) -> Result<FileOutcome, BuildError> {
        let source = self.source_dir.join(relative);
        let target = self.output_dir.join(relative);

        if !is_eligible(&extension_of(relative), &self.eligible) {
            create_parent(&target)?;
            fs::copy(&source, &target).map_err(|e| io_error(&target, e))?;
            return Ok(FileOutcome::Copied);
        }

        let content = fs::read_to_string(&source).map_err(|e| io_error(&source, e))?;
        let mut doc = Document::new(relative, content);
        self.pipeline.run(&mut doc).map_err(|source| {
            tracing::warn!(path = %relative.display(), error = %source, "Document failed");
            BuildError::Stage {
                path: relative.to_path_buf(),
                source,
            }
        })?;

        create_parent(&target)?;
        fs::write(&target, doc.content).map_err(|e| io_error(&target, e))?;
        tracing::debug!(path = %relative.display(), "Document processed");
        Ok(FileOutcome::Processed)
    }
}

/// Absolute, symlink-free form of a directory that may not exist yet.
///
/// The deepest existing ancestor is canonicalized and the rest is appended.
fn resolve_dir(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }

    for ancestor in normalized.ancestors() {
        if let Ok(canonical) = ancestor.canonicalize() {
            return match normalized.strip_prefix(ancestor) {
                Ok(rest) => canonical.join(rest),
                Err(_) => canonical,
            };
        }
    }
    normalized
}

fn create_parent(target: &Path) -> Result<(), BuildError> {
    match target.parent() {
        Some(parent) => fs::create_dir_all(parent).map_err(|e| io_error(parent, e)),
        None => Ok(()),
    }
}

fn io_error(path: &Path, source: std::io::Error) -> BuildError {
    BuildError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(results: Vec<Result<FileOutcome, BuildError>>) -> BuildReport {
        BuildReport {
            files: results
                .into_iter()
                .enumerate()
                .map(|(i, result)| FileReport {
                    path: PathBuf::from(format!("{i}.md")),
                    result,
                })
                .collect(),
        }
    }

    #[test]
    fn test_report_counts() {
        let report = report(vec![
            Ok(FileOutcome::Processed),
            Ok(FileOutcome::Copied),
            Ok(FileOutcome::Processed),
            Err(BuildError::SourceNotFound(PathBuf::from("x"))),
        ]);

        assert_eq!(report.processed(), 2);
        assert_eq!(report.copied(), 1);
        assert_eq!(report.failures().count(), 1);
        assert!(!report.is_success());
    }

    #[test]
    fn test_empty_report_is_success() {
        assert!(BuildReport::default().is_success());
    }

    #[test]
    fn test_missing_source_dir() {
        let builder = SiteBuilder::new(
            PathBuf::from("/nonexistent/linemark"),
            PathBuf::from("/nonexistent/linemark/_site"),
            Pipeline::new(),
            HashSet::new(),
        );
        assert!(matches!(builder.build(), Err(BuildError::SourceNotFound(_))));
    }

    #[test]
    fn test_output_same_as_source_refused() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("page.md"), "text\n").unwrap();

        let outputs = [
            dir.path().join("."),
            dir.path().join("sub/.."),
            dir.path().to_path_buf(),
        ];
        for output in outputs {
            let builder = SiteBuilder::new(
                dir.path().to_path_buf(),
                output,
                Pipeline::new(),
                HashSet::new(),
            );
            assert!(matches!(
                builder.build(),
                Err(BuildError::OutputOverlapsSource(_))
            ));
        }
    }

    #[test]
    fn test_output_parent_of_source_refused() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("docs");
        fs::create_dir(&source).unwrap();

        let builder = SiteBuilder::new(
            source,
            dir.path().to_path_buf(),
            Pipeline::new(),
            HashSet::new(),
        );
        assert!(matches!(
            builder.build(),
            Err(BuildError::OutputOverlapsSource(_))
        ));
    }

    #[test]
    fn test_resolve_dir_missing_tail() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_dir(&dir.path().join("a/./b/../c"));
        assert_eq!(resolved, dir.path().canonicalize().unwrap().join("a/c"));
    }

    #[test]
    fn test_io_error_display_names_path() {
        let err = io_error(
            Path::new("/out/page.md"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "/out/page.md: denied");
    }
}
