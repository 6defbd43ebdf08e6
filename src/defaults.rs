//! Default values for pandoc-sync configuration.
//!
//! This module provides centralized default values used across the library
//! and the commands, ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// Configuration file looked up in the current directory.
///
/// Can be overridden by the `--config` CLI flag or the `PANDOC_SYNC_CONFIG`
/// environment variable.
pub const DEFAULT_CONFIG_FILE: &str = ".pandoc-sync.yaml";

/// Converter executable, resolved through `PATH`.
pub const DEFAULT_CONVERTER: &str = "pandoc";

/// Name of the build state snapshot kept in the output directory.
pub const STATE_FILE_NAME: &str = ".pandoc-sync-state.json";

/// Source directories used when the configuration names none.
pub fn default_sources() -> Vec<PathBuf> {
    vec![PathBuf::from("docs")]
}

/// Output directory used when the configuration names none.
pub fn default_output_dir() -> PathBuf {
    PathBuf::from("build").join("docs")
}

/// Separate per-format output directories are on unless disabled.
pub fn default_separate_output() -> bool {
    true
}
