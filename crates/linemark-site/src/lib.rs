//! Document pipeline and parallel site build for linemark.
//!
//! A [`Pipeline`] is an explicit, ordered list of [`Stage`]s applied to each
//! [`Document`]. The standard pipeline runs [`ExtractStage`] followed by
//! [`RenderStage`]. [`SiteBuilder`] walks a source tree, runs eligible
//! documents through the pipeline in parallel and mirrors the result into an
//! output tree.
//!
//! # Example
//!
//! ```
//! use std::collections::HashSet;
//! use linemark_extract::Extractor;
//! use linemark_site::{Document, ExtractStage, Pipeline, RenderStage};
//!
//! let eligible: HashSet<String> = ["md".to_owned()].into();
//! let pipeline = Pipeline::new()
//!     .with_stage(ExtractStage::new(Extractor::new(), eligible))
//!     .with_stage(RenderStage::default());
//!
//! let mut doc = Document::new("page.md", "{1}\n```sh\nls\n```\n");
//! pipeline.run(&mut doc).unwrap();
//! assert!(doc.content.contains(r#"<span class="hll">ls"#));
//! ```

mod builder;
mod document;
mod pipeline;
mod scanner;
mod stage;

pub use builder::{BuildError, BuildReport, FileOutcome, FileReport, SiteBuilder};
pub use document::Document;
pub use pipeline::Pipeline;
pub use stage::{ExtractStage, RenderStage, Stage, StageError};
