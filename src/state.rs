//! Persisted build state
//!
//! After every build a JSON snapshot is written to the output directory. It
//! records the settings fingerprint and, for each known source, its size and
//! modification time. A source whose conversion failed is kept in the
//! snapshot marked dirty: its targets may exist, so it must still be deleted
//! if the source goes away, but it is never up to date. The next build
//! compares the live files against this snapshot to decide what changed.
//!
//! A missing snapshot, one written by a different state version, or one
//! recorded under different settings means there is no usable history and
//! the build runs non-incrementally.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Version of the on-disk snapshot layout
pub const STATE_VERSION: u32 = 1;

/// Cheap identity of a source file's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFingerprint {
    /// Size in bytes
    pub len: u64,
    /// Modification time in nanoseconds since the Unix epoch
    pub modified_ns: u64,
    /// The last conversion of this source failed
    #[serde(default, skip_serializing_if = "is_false")]
    pub dirty: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl SourceFingerprint {
    pub fn new(len: u64, modified_ns: u64) -> Self {
        Self {
            len,
            modified_ns,
            dirty: false,
        }
    }

    /// Same fingerprint, flagged as needing another conversion
    pub fn into_dirty(self) -> Self {
        Self {
            dirty: true,
            ..self
        }
    }

    /// Whether a live file with fingerprint `current` needs no work
    pub fn is_current(&self, current: &SourceFingerprint) -> bool {
        !self.dirty && self.len == current.len && self.modified_ns == current.modified_ns
    }

    /// Read the fingerprint of `path` from its metadata
    pub fn of(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path)?;
        let modified_ns = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
            .unwrap_or(0);
        Ok(Self::new(metadata.len(), modified_ns))
    }
}

/// Fingerprint every file in `files`
pub fn scan(files: &[PathBuf]) -> Result<BTreeMap<PathBuf, SourceFingerprint>> {
    files
        .iter()
        .map(|path| Ok((path.clone(), SourceFingerprint::of(path)?)))
        .collect()
}

/// Snapshot of a completed build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildState {
    pub version: u32,
    /// [`BuildSettings::fingerprint`](crate::settings::BuildSettings::fingerprint)
    /// of the build that wrote this snapshot
    pub settings: String,
    pub sources: BTreeMap<PathBuf, SourceFingerprint>,
}

impl BuildState {
    pub fn new(settings: String, sources: BTreeMap<PathBuf, SourceFingerprint>) -> Self {
        Self {
            version: STATE_VERSION,
            settings,
            sources,
        }
    }

    /// Load the snapshot at `path`
    ///
    /// Returns `Ok(None)` when there is no snapshot or it uses another state
    /// version. A snapshot that exists but cannot be read or parsed is an
    /// error.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::State {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };

        let state: BuildState = serde_json::from_str(&content).map_err(|e| Error::State {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if state.version != STATE_VERSION {
            debug!(
                "Ignoring build state version {} (expected {})",
                state.version, STATE_VERSION
            );
            return Ok(None);
        }
        Ok(Some(state))
    }

    /// History usable under `settings_fingerprint`, if any
    pub fn matching(self, settings_fingerprint: &str) -> Option<Self> {
        if self.settings == settings_fingerprint {
            Some(self)
        } else {
            debug!("Build settings changed since the last build");
            None
        }
    }

    /// Write the snapshot to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::DirectoryCreation {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| Error::State {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Delete the snapshot at `path`; a missing snapshot is not an error
    pub fn remove(path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(Error::State {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            _ => Ok(()),
        }
    }
}
