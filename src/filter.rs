//! Include/exclude filtering of source files
//!
//! Patterns use `glob` syntax and are matched against the path of a file
//! relative to its source root, with `/` as separator.

use std::path::Path;

use glob::{MatchOptions, Pattern};

use crate::error::Result;
use crate::path::to_slash;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A compiled include/exclude predicate
///
/// A file is accepted when it matches at least one include pattern (or no
/// include patterns are configured) and matches no exclude pattern.
#[derive(Debug, Clone, Default)]
pub struct SourceFilter {
    includes: Vec<Pattern>,
    excludes: Vec<Pattern>,
}

impl SourceFilter {
    /// Compile the given patterns, failing on the first invalid one
    pub fn new<S: AsRef<str>>(includes: &[S], excludes: &[S]) -> Result<Self> {
        Ok(Self {
            includes: compile(includes)?,
            excludes: compile(excludes)?,
        })
    }

    /// A filter accepting every file
    pub fn accept_all() -> Self {
        Self::default()
    }

    /// Test a path relative to its source root
    pub fn accepts(&self, relative: &Path) -> bool {
        let candidate = to_slash(relative);
        let included = self.includes.is_empty()
            || self
                .includes
                .iter()
                .any(|p| p.matches_with(&candidate, MATCH_OPTIONS));
        included
            && !self
                .excludes
                .iter()
                .any(|p| p.matches_with(&candidate, MATCH_OPTIONS))
    }

    pub fn includes(&self) -> impl Iterator<Item = &str> {
        self.includes.iter().map(Pattern::as_str)
    }

    pub fn excludes(&self) -> impl Iterator<Item = &str> {
        self.excludes.iter().map(Pattern::as_str)
    }
}

fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p.as_ref()).map_err(Into::into))
        .collect()
}
