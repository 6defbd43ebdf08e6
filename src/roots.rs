//! Source roots and base-directory lookup
//!
//! Every discovered source file is relativized against the root that owns it;
//! that relative path is what gets mirrored under the output directory.

use std::path::{Path, PathBuf};

use log::warn;

use crate::path::{is_descendant, normalize};

/// The outcome of looking up the owning root of a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located<'a> {
    /// The file lies under a configured root
    Root(&'a Path),
    /// No root matched; the file's parent directory stands in for one
    Fallback(PathBuf),
}

impl Located<'_> {
    pub fn base_dir(&self) -> &Path {
        match self {
            Located::Root(root) => root,
            Located::Fallback(parent) => parent,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Located::Fallback(_))
    }
}

/// Configured source roots, in configuration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRoots {
    roots: Vec<PathBuf>,
}

impl SourceRoots {
    /// Roots are normalized lexically; order is kept since it decides
    /// ownership between nested roots.
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            roots: roots.into_iter().map(|r| normalize(r.as_ref())).collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.roots.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Find the root that owns `source`
    ///
    /// Roots are compared by path components. When roots are nested and
    /// several contain the file, the one configured last wins. A file outside
    /// every root falls back to its own parent directory.
    pub fn locate(&self, source: &Path) -> Located<'_> {
        let owner = self
            .roots
            .iter()
            .rev()
            .find(|root| is_descendant(source, root));

        match owner {
            Some(root) => Located::Root(root),
            None => {
                warn!(
                    "{} is not under any source root, using its parent directory as base",
                    source.display()
                );
                Located::Fallback(
                    source
                        .parent()
                        .map(Path::to_path_buf)
                        .unwrap_or_default(),
                )
            }
        }
    }
}
