//! Line-highlight annotation extractor for fenced code blocks.
//!
//! Rewrites an informal markdown dialect for highlighted code lines into
//! highlight markers consumed by a separate rendering stage:
//!
//! ````markdown
//! {1 3}
//! ```python
//! import os
//! import sys
//! print(os.getcwd())
//! ```
//! ````
//!
//! becomes
//!
//! ```text
//! {% highlight python mark_lines="1 3" body_lines="3" %}
//! import os
//! import sys
//! print(os.getcwd())
//! {% endhighlight %}
//! ```
//!
//! # Example
//!
//! ```
//! use std::collections::HashSet;
//! use linemark_extract::extract;
//!
//! let eligible: HashSet<String> = ["md".to_owned()].into();
//!
//! let out = extract("{2}\n```sh\ncd /\nls\n```\n", "md", &eligible).unwrap();
//! assert!(out.contains(r#"mark_lines="2""#));
//!
//! let untouched = extract("{2}\n```sh\ncd /\nls\n```\n", "txt", &eligible).unwrap();
//! assert_eq!(untouched, "{2}\n```sh\ncd /\nls\n```\n");
//! ```

mod error;
mod extractor;
pub mod fence;
mod line_spec;
mod lines;
pub mod marker;

pub use error::{ExtractError, LineSpecError, MarkerError};
pub use extractor::{Extractor, Notation, extract, is_eligible};
pub use line_spec::{HighlightLineSet, parse_line_spec};
pub use lines::{Line, split_lines};
pub use marker::{MarkerHeader, RenderRequest};
