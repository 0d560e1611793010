//! Source tree discovery.
//!
//! Walks the source directory and lists every regular file, skipping hidden
//! entries and the output directory when it lives inside the source tree.

use std::fs;
use std::path::{Path, PathBuf};

/// Discovers source files by walking the filesystem.
pub(crate) struct Scanner {
    source_dir: PathBuf,
    exclude: Option<PathBuf>,
}

impl Scanner {
    /// Create a scanner rooted at `source_dir`.
    pub fn new(source_dir: PathBuf) -> Self {
        Self {
            source_dir,
            exclude: None,
        }
    }

    /// Skip everything under `dir`.
    #[must_use]
    pub fn excluding(mut self, dir: PathBuf) -> Self {
        self.exclude = Some(dir);
        self
    }

    /// Paths of all files, relative to the source directory, sorted.
    ///
    /// Returns an empty Vec if the source directory doesn't exist.
    pub fn scan(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        if self.source_dir.is_dir() {
            self.scan_directory(&self.source_dir, Path::new(""), &mut files);
        }
        files.sort();
        files
    }

    fn scan_directory(&self, dir_path: &Path, relative: &Path, files: &mut Vec<PathBuf>) {
        let Ok(entries) = fs::read_dir(dir_path) else {
            tracing::warn!(path = %dir_path.display(), "Unreadable directory skipped");
            return;
        };

        for entry in entries.filter_map(Result::ok) {
            let name = entry.file_name();
            if name.to_string_lossy().starts_with('.') {
                continue;
            }

            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };

            if file_type.is_dir() {
                if self.is_excluded(&path) {
                    tracing::debug!(path = %path.display(), "Skipping output directory");
                    continue;
                }
                self.scan_directory(&path, &relative.join(&name), files);
            } else if file_type.is_file() {
                files.push(relative.join(&name));
            }
        }
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.exclude.as_ref().is_some_and(|exclude| {
            path == exclude
                || matches!(
                    (path.canonicalize(), exclude.canonicalize()),
                    (Ok(a), Ok(b)) if a == b
                )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_scan_nested() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("index.md"));
        touch(&dir.path().join("guide/setup.md"));
        touch(&dir.path().join("guide/img/logo.png"));

        let files = Scanner::new(dir.path().to_path_buf()).scan();

        assert_eq!(
            files,
            vec![
                PathBuf::from("guide/img/logo.png"),
                PathBuf::from("guide/setup.md"),
                PathBuf::from("index.md"),
            ]
        );
    }

    #[test]
    fn test_scan_skips_hidden() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join(".git/config"));
        touch(&dir.path().join(".draft.md"));
        touch(&dir.path().join("page.md"));

        let files = Scanner::new(dir.path().to_path_buf()).scan();
        assert_eq!(files, vec![PathBuf::from("page.md")]);
    }

    #[test]
    fn test_scan_skips_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("page.md"));
        touch(&dir.path().join("_site/page.md"));

        let files = Scanner::new(dir.path().to_path_buf())
            .excluding(dir.path().join("_site"))
            .scan();
        assert_eq!(files, vec![PathBuf::from("page.md")]);
    }

    #[test]
    fn test_scan_missing_dir() {
        let files = Scanner::new(PathBuf::from("/nonexistent/linemark")).scan();
        assert!(files.is_empty());
    }
}
