//! # CLI Command Implementations
//!
//! Each subcommand of `pandoc-sync` lives in its own file with:
//! - an `Args` struct holding the command's options, derived with `clap`
//! - an `execute` function that loads the configuration, calls into the
//!   `pandoc_sync` library and prints a summary
//!
//! Loading and validating the configuration file is shared by every command
//! and lives here.

pub mod build;
pub mod clean;
pub mod completions;
pub mod ls;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use pandoc_sync::config::{self, Config};
use pandoc_sync::defaults::DEFAULT_CONFIG_FILE;
use pandoc_sync::settings::BuildSettings;

/// Location of the configuration file
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Path to the configuration file
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "PANDOC_SYNC_CONFIG",
        default_value = DEFAULT_CONFIG_FILE
    )]
    pub config: PathBuf,
}

impl ConfigArgs {
    /// Absolute path of the configuration file
    pub fn path(&self) -> Result<PathBuf> {
        absolute(&self.config)
    }

    /// Parse the configuration file
    ///
    /// Returns the configuration together with the directory relative paths
    /// in it resolve against.
    pub fn load(&self) -> Result<(Config, PathBuf)> {
        let path = self.path()?;
        if !path.exists() {
            anyhow::bail!("Configuration file not found: {}", path.display());
        }
        let config = config::from_file(&path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok((config, base_dir))
    }

    /// Parse and validate the configuration file
    pub fn settings(&self) -> Result<BuildSettings> {
        let (config, base_dir) = self.load()?;
        Ok(config.into_settings(&base_dir)?)
    }
}

/// Resolve a command-line path against the current directory
pub fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    Ok(pandoc_sync::path::normalize(&cwd.join(path)))
}

/// Print a path relative to the current directory when possible
pub fn display_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}
