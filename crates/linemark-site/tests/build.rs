//! End-to-end site builds over a temporary source tree.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use linemark_extract::Extractor;
use linemark_site::{
    BuildError, ExtractStage, FileOutcome, Pipeline, RenderStage, SiteBuilder, StageError,
};
use pretty_assertions::assert_eq;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn eligible() -> HashSet<String> {
    ["md".to_owned(), "markdown".to_owned()].into()
}

fn builder(root: &Path, pipeline: Pipeline) -> SiteBuilder {
    SiteBuilder::new(
        root.to_path_buf(),
        root.join("_site"),
        pipeline,
        eligible(),
    )
}

fn full_pipeline() -> Pipeline {
    Pipeline::new()
        .with_stage(ExtractStage::new(Extractor::new(), eligible()))
        .with_stage(RenderStage::default())
}

#[test]
fn test_build_renders_and_copies() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "index.md", "# Home\n\n{2}\n```python\na = 1\nb = 2\n```\n");
    write(root, "notes.txt", "{1}\n```sh\nls\n```\n");
    write(root, "guide/usage.markdown", "```sh\nls\n```\n");

    let report = builder(root, full_pipeline()).build().unwrap();

    assert!(report.is_success());
    assert_eq!(report.processed(), 2);
    assert_eq!(report.copied(), 1);

    assert_eq!(
        fs::read_to_string(root.join("_site/index.md")).unwrap(),
        "# Home\n\n<figure class=\"highlight\"><pre><code class=\"language-python\" data-lang=\"python\">a = 1\n<span class=\"hll\">b = 2\n</span></code></pre></figure>\n"
    );
    assert_eq!(
        fs::read_to_string(root.join("_site/notes.txt")).unwrap(),
        "{1}\n```sh\nls\n```\n"
    );
    assert_eq!(
        fs::read_to_string(root.join("_site/guide/usage.markdown")).unwrap(),
        "```sh\nls\n```\n"
    );
}

#[test]
fn test_build_extract_only() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "page.md", "{1 3 3}\n```rb\na\nb\nc\n```\n");

    let pipeline =
        Pipeline::new().with_stage(ExtractStage::new(Extractor::new(), eligible()));
    let report = builder(root, pipeline).build().unwrap();

    assert!(report.is_success());
    assert_eq!(
        fs::read_to_string(root.join("_site/page.md")).unwrap(),
        "{% highlight rb mark_lines=\"1 3\" body_lines=\"3\" %}\na\nb\nc\n{% endhighlight %}\n"
    );
}

#[test]
fn test_build_failure_is_per_file() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "bad.md", "{1 x 3}\n```sh\nls\n```\n");
    write(root, "good.md", "{1}\n```sh\nls\n```\n");

    let report = builder(root, full_pipeline()).build().unwrap();

    assert!(!report.is_success());
    assert_eq!(report.processed(), 1);

    let paths: Vec<&PathBuf> = report.files.iter().map(|f| &f.path).collect();
    assert_eq!(paths, [&PathBuf::from("bad.md"), &PathBuf::from("good.md")]);

    let failure = report.failures().next().unwrap();
    match failure {
        BuildError::Stage { path, source } => {
            assert_eq!(path, Path::new("bad.md"));
            assert!(matches!(source, StageError::Extract(_)));
            assert!(failure.to_string().contains("\"x\""));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    assert!(!root.join("_site/bad.md").exists());
    assert!(root.join("_site/good.md").exists());
    assert!(matches!(
        report.files[1].result,
        Ok(FileOutcome::Processed)
    ));
}

#[test]
fn test_build_skips_output_and_hidden() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "page.md", "text\n");
    write(root, "_site/stale.md", "old\n");
    write(root, ".cache/x.md", "hidden\n");

    let report = builder(root, full_pipeline()).build().unwrap();

    assert_eq!(report.files.len(), 1);
    assert_eq!(report.files[0].path, PathBuf::from("page.md"));
    assert!(!root.join("_site/.cache").exists());
}

#[test]
fn test_rebuild_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "page.md", "{}\n```sh\nls\n```\n");

    builder(root, full_pipeline()).build().unwrap();
    let first = fs::read_to_string(root.join("_site/page.md")).unwrap();
    builder(root, full_pipeline()).build().unwrap();
    let second = fs::read_to_string(root.join("_site/page.md")).unwrap();

    assert_eq!(first, second);
    assert!(first.contains("<pre class=\"lineno\">1\n</pre>"));
}

#[test]
fn test_build_into_source_dir_leaves_sources_intact() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "page.md", "{1}\n```sh\nls\n```\n");

    let builder = SiteBuilder::new(
        root.to_path_buf(),
        root.join("."),
        full_pipeline(),
        eligible(),
    );

    assert!(matches!(
        builder.build(),
        Err(BuildError::OutputOverlapsSource(_))
    ));
    assert_eq!(
        fs::read_to_string(root.join("page.md")).unwrap(),
        "{1}\n```sh\nls\n```\n"
    );
}
