//! Classification of source files for an incremental build

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::state::SourceFingerprint;

/// Source files split by what a build must do with them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Unchanged since the last build; nothing to do
    pub up_to_date: Vec<PathBuf>,
    /// New or changed; every target is regenerated
    pub added_or_modified: Vec<PathBuf>,
    /// Gone since the last build; every target is deleted
    pub removed: Vec<PathBuf>,
    /// Whether the classification was derived from a previous build
    pub incremental: bool,
}

impl ChangeSet {
    /// Treat every file as added, as on a first build
    pub fn full(files: Vec<PathBuf>) -> Self {
        Self {
            added_or_modified: files,
            ..Self::default()
        }
    }

    /// Compare current fingerprints with those recorded by the previous build
    ///
    /// A dirty entry is never up to date: it is converted again while the
    /// file exists and its targets are deleted once it is gone.
    pub fn classify(
        previous: &BTreeMap<PathBuf, SourceFingerprint>,
        current: &BTreeMap<PathBuf, SourceFingerprint>,
    ) -> Self {
        let mut changes = Self {
            incremental: true,
            ..Self::default()
        };

        for (path, fingerprint) in current {
            match previous.get(path) {
                Some(old) if old.is_current(fingerprint) => changes.up_to_date.push(path.clone()),
                _ => changes.added_or_modified.push(path.clone()),
            }
        }
        changes.removed = previous
            .keys()
            .filter(|path| !current.contains_key(*path))
            .cloned()
            .collect();

        changes
    }

    /// Whether the build has anything to do
    pub fn is_empty(&self) -> bool {
        self.added_or_modified.is_empty() && self.removed.is_empty()
    }

    /// Number of files in any class
    pub fn len(&self) -> usize {
        self.up_to_date.len() + self.added_or_modified.len() + self.removed.len()
    }
}
