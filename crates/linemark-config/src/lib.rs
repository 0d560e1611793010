//! Configuration management for linemark.
//!
//! Parses `linemark.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! Build paths support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `build.source_dir`
//! - `build.output_dir`

mod expand;

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use linemark_extract::Notation;
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override source directory.
    pub source_dir: Option<PathBuf>,
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override line-number gutter on every block.
    pub line_numbers: Option<bool>,
    /// Override accepted annotation notation.
    pub notation: Option<Notation>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "linemark.toml";

/// Jekyll's default `markdown_ext` list.
const DEFAULT_EXTENSIONS: &[&str] = &["markdown", "mkdown", "mkdn", "mkd", "md"];

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which documents are preprocessed.
    pub markdown: MarkdownConfig,
    /// Annotation recognition.
    pub annotations: AnnotationsConfig,
    /// Rendering of highlight markers.
    pub render: RenderConfig,
    /// Build paths (relative strings from TOML).
    build: BuildConfigRaw,

    /// Resolved build configuration (set after loading).
    #[serde(skip)]
    pub build_resolved: BuildConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Markdown document selection.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// File extensions (without dot) eligible for preprocessing.
    pub extensions: Vec<String>,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|&e| e.to_owned()).collect(),
        }
    }
}

impl MarkdownConfig {
    /// Eligible extensions as a set.
    #[must_use]
    pub fn eligible(&self) -> HashSet<String> {
        self.extensions.iter().cloned().collect()
    }
}

/// Annotation recognition configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnnotationsConfig {
    /// Accepted notation: `prefix`, `suffix` or `both`.
    pub notation: Notation,
}

/// Rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Request a line-number gutter on every block.
    pub line_numbers: bool,
    /// CSS class for highlighted lines.
    pub highlight_class: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            line_numbers: false,
            highlight_class: "hll".to_owned(),
        }
    }
}

/// Raw build configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
}

/// Resolved build configuration with absolute paths.
#[derive(Debug, Default)]
pub struct BuildConfig {
    /// Directory holding source documents.
    pub source_dir: PathBuf,
    /// Directory receiving processed documents.
    pub output_dir: PathBuf,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`build.source_dir`").
        field: String,
        /// Error message (e.g., "${`DOCS_DIR`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `linemark.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.build_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.build_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(line_numbers) = settings.line_numbers {
            self.render.line_numbers = line_numbers;
        }
        if let Some(notation) = settings.notation {
            self.annotations.notation = notation;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            markdown: MarkdownConfig::default(),
            annotations: AnnotationsConfig::default(),
            render: RenderConfig::default(),
            build: BuildConfigRaw::default(),
            build_resolved: BuildConfig {
                source_dir: base.to_path_buf(),
                output_dir: base.join("_site"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after applying
    /// CLI settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_markdown()?;
        self.validate_render()?;
        self.validate_build()?;
        Ok(())
    }

    /// Validate markdown configuration.
    fn validate_markdown(&self) -> Result<(), ConfigError> {
        if self.markdown.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "markdown.extensions cannot be empty".to_owned(),
            ));
        }

        for ext in &self.markdown.extensions {
            if ext.is_empty() || ext.contains('.') || ext.contains(char::is_whitespace) {
                return Err(ConfigError::Validation(format!(
                    "markdown.extensions entry {ext:?} must be a bare extension like \"md\""
                )));
            }
        }

        Ok(())
    }

    /// Validate render configuration.
    fn validate_render(&self) -> Result<(), ConfigError> {
        if !is_css_identifier(&self.render.highlight_class) {
            return Err(ConfigError::Validation(format!(
                "render.highlight_class {:?} is not a valid CSS class name",
                self.render.highlight_class
            )));
        }
        Ok(())
    }

    /// Validate build configuration.
    ///
    /// Relative CLI paths are resolved against the working directory first,
    /// so `-o .` is caught when the source is the working directory.
    fn validate_build(&self) -> Result<(), ConfigError> {
        let source = lexical_absolute(&self.build_resolved.source_dir);
        let output = lexical_absolute(&self.build_resolved.output_dir);
        if source.starts_with(&output) {
            return Err(ConfigError::Validation(format!(
                "build.output_dir {} must not be build.source_dir or one of its parents",
                self.build_resolved.output_dir.display()
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.build.source_dir {
            self.build.source_dir = Some(expand::expand_env(dir, "build.source_dir")?);
        }
        if let Some(ref dir) = self.build.output_dir {
            self.build.output_dir = Some(expand::expand_env(dir, "build.output_dir")?);
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.build_resolved = BuildConfig {
            source_dir: resolve(self.build.source_dir.as_deref(), "."),
            output_dir: resolve(self.build.output_dir.as_deref(), "_site"),
        };
    }
}

/// Absolute form of `path` with `.` and `..` resolved textually.
fn lexical_absolute(path: &Path) -> PathBuf {
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
    normalized
}

/// Check for a plain CSS class name (`hll`, `line-mark`, `_x1`).
fn is_css_identifier(name: &str) -> bool {
    let body = name.strip_prefix('-').unwrap_or(name);
    let mut chars = body.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c == '-' || c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));

        assert_eq!(
            config.markdown.extensions,
            vec!["markdown", "mkdown", "mkdn", "mkd", "md"]
        );
        assert_eq!(config.annotations.notation, Notation::Both);
        assert!(!config.render.line_numbers);
        assert_eq!(config.render.highlight_class, "hll");
        assert_eq!(config.build_resolved.source_dir, PathBuf::from("/test"));
        assert_eq!(config.build_resolved.output_dir, PathBuf::from("/test/_site"));
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.markdown.extensions.len(), 5);
        assert_eq!(config.annotations.notation, Notation::Both);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[markdown]
extensions = ["md", "mdx"]

[annotations]
notation = "prefix"

[render]
line_numbers = true
highlight_class = "mark"

[build]
source_dir = "content"
output_dir = "public"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.markdown.extensions, vec!["md", "mdx"]);
        assert_eq!(config.annotations.notation, Notation::Prefix);
        assert!(config.render.line_numbers);
        assert_eq!(config.render.highlight_class, "mark");
        assert_eq!(
            config.build_resolved.source_dir,
            PathBuf::from("/project/content")
        );
        assert_eq!(
            config.build_resolved.output_dir,
            PathBuf::from("/project/public")
        );
    }

    #[test]
    fn test_parse_invalid_notation() {
        let result: Result<Config, _> = toml::from_str("[annotations]\nnotation = \"middle\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_eligible_set() {
        let config: Config = toml::from_str("[markdown]\nextensions = [\"md\", \"md\"]\n").unwrap();
        let eligible = config.markdown.eligible();
        assert_eq!(eligible.len(), 1);
        assert!(eligible.contains("md"));
    }

    #[test]
    fn test_resolve_paths_defaults() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.build_resolved.source_dir, PathBuf::from("/project/."));
        assert_eq!(
            config.build_resolved.output_dir,
            PathBuf::from("/project/_site")
        );
    }

    #[test]
    fn test_apply_cli_settings_source_dir() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            source_dir: Some(PathBuf::from("/custom/docs")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.build_resolved.source_dir,
            PathBuf::from("/custom/docs")
        );
        assert_eq!(
            config.build_resolved.output_dir,
            PathBuf::from("/test/_site")
        ); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_multiple() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            output_dir: Some(PathBuf::from("/out")),
            line_numbers: Some(true),
            notation: Some(Notation::Suffix),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.build_resolved.output_dir, PathBuf::from("/out"));
        assert!(config.render.line_numbers);
        assert_eq!(config.annotations.notation, Notation::Suffix);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings::default());

        assert!(!config.render.line_numbers);
        assert_eq!(config.annotations.notation, Notation::Both);
        assert_eq!(config.build_resolved.source_dir, PathBuf::from("/test"));
    }

    #[test]
    fn test_expand_env_vars_build_dirs() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("LINEMARK_TEST_OUT", "dist");
        }

        let toml = r#"
[build]
output_dir = "${LINEMARK_TEST_OUT}/site"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.build.output_dir.as_deref(), Some("dist/site"));

        unsafe {
            std::env::remove_var("LINEMARK_TEST_OUT");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        let toml = r#"
[build]
source_dir = "${LINEMARK_TEST_MISSING_DIR}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { ref field, .. } if field == "build.source_dir"));
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_extensions_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.markdown.extensions.clear();
        assert_validation_error(&config, &["markdown.extensions", "empty"]);
    }

    #[test]
    fn test_validate_extension_with_dot() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.markdown.extensions = vec![".md".to_owned()];
        assert_validation_error(&config, &["markdown.extensions", ".md"]);
    }

    #[test]
    fn test_validate_highlight_class() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.render.highlight_class = "two words".to_owned();
        assert_validation_error(&config, &["render.highlight_class"]);

        config.render.highlight_class = String::new();
        assert_validation_error(&config, &["render.highlight_class"]);
    }

    #[test]
    fn test_validate_output_equals_source() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.build_resolved.output_dir = PathBuf::from("/test");
        assert_validation_error(&config, &["build.output_dir"]);
    }

    #[test]
    fn test_validate_relative_output_resolving_to_source() {
        let cwd = std::env::current_dir().unwrap();
        let mut config = Config::default_with_base(&cwd);
        config.apply_cli_settings(&CliSettings {
            output_dir: Some(PathBuf::from(".")),
            ..Default::default()
        });
        assert_validation_error(&config, &["build.output_dir"]);
    }

    #[test]
    fn test_validate_output_parent_of_source() {
        let mut config = Config::default_with_base(Path::new("/test/docs"));
        config.build_resolved.output_dir = PathBuf::from("/test");
        assert_validation_error(&config, &["build.output_dir", "parents"]);

        config.build_resolved.output_dir = PathBuf::from("/test/docs/../docs");
        assert_validation_error(&config, &["build.output_dir"]);
    }

    #[test]
    fn test_validate_output_inside_source_allowed() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.build_resolved.output_dir = PathBuf::from("/test/public/site");
        assert!(config.validate().is_ok());

        config.build_resolved.output_dir = PathBuf::from("/test-site");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lexical_absolute() {
        assert_eq!(
            lexical_absolute(Path::new("/a/./b/../c")),
            PathBuf::from("/a/c")
        );
        assert!(lexical_absolute(Path::new(".")).is_absolute());
    }

    #[test]
    fn test_is_css_identifier() {
        assert!(is_css_identifier("hll"));
        assert!(is_css_identifier("line-mark"));
        assert!(is_css_identifier("_x1"));
        assert!(is_css_identifier("-webkit-ish"));
        assert!(!is_css_identifier("1st"));
        assert!(!is_css_identifier("a b"));
        assert!(!is_css_identifier(""));
        assert!(!is_css_identifier("-"));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("linemark.toml");
        std::fs::write(
            &path,
            "[build]\nsource_dir = \"docs\"\n\n[render]\nline_numbers = true\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.build_resolved.source_dir, dir.path().join("docs"));
        assert_eq!(config.build_resolved.output_dir, dir.path().join("_site"));
        assert!(config.render.line_numbers);
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/linemark.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_cli_settings_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("linemark.toml");
        std::fs::write(&path, "[build]\nsource_dir = \"docs\"\n").unwrap();

        let settings = CliSettings {
            output_dir: Some(dir.path().join("docs")),
            ..Default::default()
        };
        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
