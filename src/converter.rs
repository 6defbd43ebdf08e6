//! # Converter Invocation
//!
//! The boundary between the build engine and the external document
//! converter. The engine only ever talks to the [`Converter`] trait, which
//! keeps the processor testable without spawning processes.
//!
//! [`PandocConverter`] is the real implementation. For each job it runs
//!
//! ```text
//! pandoc --standalone <source> --to=<format> --output=<target>
//! ```
//!
//! and waits for it to exit. The exit status is the only success signal;
//! the produced file is never inspected.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::trace;

use crate::error::{Error, Result};
use crate::format::OutputFormat;

/// One conversion unit: produce `target` from `source` in `format`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub source: PathBuf,
    pub target: PathBuf,
    pub format: OutputFormat,
}

/// Trait for converter backends - allows mocking in tests
pub trait Converter: Send + Sync {
    /// Produce `job.target` from `job.source`, blocking until done
    fn convert(&self, job: &ConversionJob) -> Result<()>;
}

/// Runs the pandoc executable
#[derive(Debug, Clone)]
pub struct PandocConverter {
    program: PathBuf,
}

impl PandocConverter {
    /// Use `program`, either a bare name looked up on `PATH` or a path
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments passed to the converter for `job`
    ///
    /// Paths are passed as raw OS strings so file names that are not valid
    /// UTF-8 reach the converter unchanged.
    pub fn args(job: &ConversionJob) -> Vec<OsString> {
        let mut output = OsString::from("--output=");
        output.push(&job.target);
        vec![
            OsString::from("--standalone"),
            job.source.clone().into_os_string(),
            OsString::from(format!("--to={}", job.format.name)),
            output,
        ]
    }
}

impl Converter for PandocConverter {
    fn convert(&self, job: &ConversionJob) -> Result<()> {
        let args = Self::args(job);
        trace!("Running {} {:?}", self.program.display(), args);

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| Error::ConverterSpawn {
                program: self.program.display().to_string(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(Error::Conversion {
                source_path: job.source.clone(),
                target_path: job.target.clone(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}
