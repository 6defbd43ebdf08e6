//! # Error Handling
//!
//! This module defines the centralized error type for `pandoc-sync`. It uses
//! the `thiserror` library to derive a single `Error` enum covering every
//! anticipated failure mode, each variant carrying enough context (paths,
//! exit codes, hints) to be actionable on its own.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Configuration-time variants (`ConfigParse`,
//!   `DuplicateFormat`, `FlatLayoutCollision`, `Glob`) abort before any work
//!   starts. Per-unit variants (`DirectoryCreation`, `Conversion`,
//!   `ConverterSpawn`) fail a single (source, format) conversion and are
//!   collected by the processor rather than propagated immediately.
//!   `BuildFailed` summarizes a run in which at least one unit failed.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Deleting the target of a removed source never produces an error: a target
//! that is already gone counts as deleted.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for pandoc-sync operations
#[derive(Error, Debug)]
pub enum Error {
    /// An error occurred while parsing or validating the configuration file.
    ///
    /// This error includes the specific issue and optionally a hint about how
    /// to fix it.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// The same (format, extension) pair was configured twice.
    #[error("Duplicate output format: {format} with extension '{extension}'")]
    DuplicateFormat { format: String, extension: String },

    /// Two formats would write files with the same extension into the same
    /// directory.
    #[error("Formats '{first}' and '{second}' both produce '.{extension}' files in a flat output layout\n  hint: enable separate_output or give one of them a different extension")]
    FlatLayoutCollision {
        first: String,
        second: String,
        extension: String,
    },

    /// The parent directory of a target could not be created.
    #[error("Failed to create directory '{}': {message}", path.display())]
    DirectoryCreation { path: PathBuf, message: String },

    /// The converter ran but exited unsuccessfully.
    #[error("Conversion of '{}' to '{}' failed ({}): {stderr}", source_path.display(), target_path.display(), code.map(|c| format!("exit code {}", c)).unwrap_or_else(|| "terminated by signal".to_string()))]
    Conversion {
        source_path: PathBuf,
        target_path: PathBuf,
        /// Exit code of the converter, `None` when killed by a signal
        code: Option<i32>,
        stderr: String,
    },

    /// A target resolved onto the build state snapshot and was not written.
    #[error("Target '{}' of '{}' is reserved for the build state", target_path.display(), source_path.display())]
    ReservedTarget {
        source_path: PathBuf,
        target_path: PathBuf,
    },

    /// The converter binary could not be started at all.
    #[error("Failed to run converter '{program}': {message}")]
    ConverterSpawn { program: String, message: String },

    /// The persisted build state could not be read or written.
    #[error("Build state error at '{}': {message}", path.display())]
    State { path: PathBuf, message: String },

    /// One or more conversion units failed during a build.
    #[error("{failed} of {total} conversions failed")]
    BuildFailed { failed: usize, total: usize },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON (de)serialization error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
