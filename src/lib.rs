//! # pandoc-sync
//!
//! Keeps a tree of converted documents in sync with a tree of source
//! documents. Each source file is converted by an external converter
//! (pandoc by default) into every configured output format; later builds only
//! convert what changed and delete the outputs of sources that disappeared.
//!
//! ## Quick Example
//!
//! ```
//! use std::path::Path;
//! use pandoc_sync::config;
//!
//! let yaml = r#"
//! sources: [docs]
//! output_dir: build/docs
//! formats:
//!   - html
//!   - name: latex
//!     extension: pdf
//! "#;
//! let settings = config::parse(yaml)
//!     .unwrap()
//!     .into_settings(Path::new("/proj"))
//!     .unwrap();
//!
//! let targets = settings.targets_for(Path::new("/proj/docs/api/ref.md"));
//! assert_eq!(targets[0].1, Path::new("/proj/build/docs/html/api/ref.html"));
//! assert_eq!(targets[1].1, Path::new("/proj/build/docs/latex-pdf/api/ref.pdf"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`, `settings`)**: the YAML file and the validated,
//!   immutable [`settings::BuildSettings`] derived from it.
//! - **Formats (`format`)**: output formats, their extensions and the output
//!   layout (one directory per format, or everything side by side).
//! - **Target resolution (`roots`, `target`, `path`)**: pure mapping from a
//!   source file to the file each format is written to.
//! - **Change detection (`discovery`, `state`, `changeset`)**: finds source
//!   files and classifies them against the previous build.
//! - **Processing (`processor`, `converter`, `observer`)**: turns a change set
//!   into conversion and deletion units and runs them in parallel.
//! - **Pipeline (`pipeline`)**: a complete build or clean, start to finish.
//!
//! ## Execution Flow
//!
//! 1. Discover source files below the configured sources.
//! 2. Compare them with the state recorded by the last build.
//! 3. Plan one conversion per (changed source, format) and one deletion per
//!    (removed source, format).
//! 4. Execute the plan, one source per worker, and record the new state.

pub mod changeset;
pub mod config;
pub mod converter;
pub mod defaults;
pub mod discovery;
pub mod error;
pub mod filter;
pub mod format;
pub mod observer;
pub mod output;
pub mod path;
pub mod pipeline;
pub mod processor;
pub mod roots;
pub mod settings;
pub mod state;
pub mod target;

#[cfg(test)]
mod path_proptest;
