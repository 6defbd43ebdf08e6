//! # Change Set Processing
//!
//! The incremental engine. Given a [`ChangeSet`] and the frozen
//! [`BuildSettings`], it decides which targets to (re)generate and which to
//! delete, then carries those decisions out.
//!
//! ## Process
//!
//! 1.  **Plan (`plan`)**: A pure step. Every added or modified source yields
//!     one [`Action::Convert`] per output format; every removed source yields
//!     one [`Action::Delete`] per format. Up-to-date sources yield nothing and
//!     their targets are never even resolved. Actions are grouped per source
//!     in a [`FilePlan`], formats in configuration order. A target that
//!     would land on the build state snapshot becomes an [`Action::Refuse`],
//!     which fails without running, and is never deleted.
//!
//! 2.  **Execute (`execute`)**: Runs each `FilePlan` on the rayon thread pool.
//!     Within a file, actions run in order. Before a conversion the target's
//!     parent directory is created (an existing directory is fine, so units
//!     sharing a directory do not interfere). Deleting a target that is
//!     already gone counts as success.
//!
//! A failing unit does not stop the others and nothing is rolled back; the
//! failures are collected in the [`BuildReport`]. With no formats configured
//! the plan is [`Plan::NoFormats`] and execution only reports that fact.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::changeset::ChangeSet;
use crate::converter::{ConversionJob, Converter};
use crate::error::{Error, Result};
use crate::observer::{BuildEvent, BuildObserver};
use crate::settings::BuildSettings;

/// A single unit of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Generate a target from its source
    Convert(ConversionJob),
    /// Remove the target of a source that no longer exists
    Delete { source: PathBuf, target: PathBuf },
    /// A conversion whose target is the build state snapshot; never run,
    /// reported as a failed unit
    Refuse(ConversionJob),
}

impl Action {
    pub fn target(&self) -> &Path {
        match self {
            Action::Convert(job) | Action::Refuse(job) => &job.target,
            Action::Delete { target, .. } => target,
        }
    }
}

/// All actions for one source file, in format order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePlan {
    pub source: PathBuf,
    pub actions: Vec<Action>,
}

/// What a build is going to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// No output formats are configured
    NoFormats,
    /// Per-file work; may be empty when everything is up to date
    Ready(Vec<FilePlan>),
}

impl Plan {
    pub fn files(&self) -> &[FilePlan] {
        match self {
            Plan::NoFormats => &[],
            Plan::Ready(files) => files,
        }
    }

    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.files().iter().flat_map(|f| f.actions.iter())
    }

    pub fn conversion_count(&self) -> usize {
        self.actions()
            .filter(|a| matches!(a, Action::Convert(_)))
            .count()
    }

    pub fn deletion_count(&self) -> usize {
        self.actions()
            .filter(|a| matches!(a, Action::Delete { .. }))
            .count()
    }
}

/// Decide the actions for `changes` under `settings`
pub fn plan(changes: &ChangeSet, settings: &BuildSettings) -> Plan {
    if settings.formats.is_empty() {
        return Plan::NoFormats;
    }

    let state_path = settings.state_path();

    let converts = changes.added_or_modified.iter().map(|source| FilePlan {
        source: source.clone(),
        actions: settings
            .targets_for(source)
            .into_iter()
            .map(|(format, target)| {
                let job = ConversionJob {
                    source: source.clone(),
                    target,
                    format,
                };
                if job.target == state_path {
                    Action::Refuse(job)
                } else {
                    Action::Convert(job)
                }
            })
            .collect(),
    });

    let deletes = changes.removed.iter().map(|source| FilePlan {
        source: source.clone(),
        actions: settings
            .targets_for(source)
            .into_iter()
            .filter(|(_, target)| *target != state_path)
            .map(|(_, target)| Action::Delete {
                source: source.clone(),
                target,
            })
            .collect(),
    });

    Plan::Ready(converts.chain(deletes).collect())
}

/// Trait for output-side filesystem operations - allows mocking in tests
pub trait OutputOperations: Send + Sync {
    /// Make sure the directory that will hold `target` exists
    fn create_parent(&self, target: &Path) -> Result<()>;

    /// Remove a target file
    fn remove(&self, target: &Path) -> io::Result<()>;
}

/// Output operations on the host filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskOutput;

impl OutputOperations for DiskOutput {
    fn create_parent(&self, target: &Path) -> Result<()> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::DirectoryCreation {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
        }
        Ok(())
    }

    fn remove(&self, target: &Path) -> io::Result<()> {
        fs::remove_file(target)
    }
}

/// A conversion unit that did not produce its target
#[derive(Debug)]
pub struct UnitFailure {
    pub source: PathBuf,
    pub target: PathBuf,
    pub error: Error,
}

/// Outcome of executing a plan
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Set when the plan had no formats and nothing was produced
    pub no_formats: bool,
    /// Targets that were generated
    pub converted: Vec<PathBuf>,
    /// Targets of removed sources that are now gone
    pub deleted: Vec<PathBuf>,
    pub failures: Vec<UnitFailure>,
    /// Added or modified sources whose every target was generated
    pub completed_sources: Vec<PathBuf>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of conversion units that ran
    pub fn attempted(&self) -> usize {
        self.converted.len() + self.failures.len()
    }

    /// Turn a report with failures into [`Error::BuildFailed`]
    pub fn into_result(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::BuildFailed {
                failed: self.failures.len(),
                total: self.attempted(),
            })
        }
    }

    fn absorb(&mut self, other: BuildReport) {
        self.converted.extend(other.converted);
        self.deleted.extend(other.deleted);
        self.failures.extend(other.failures);
        self.completed_sources.extend(other.completed_sources);
    }
}

/// Carry out `plan`
///
/// Files are processed in parallel; the report lists results in plan order.
pub fn execute(
    plan: &Plan,
    converter: &dyn Converter,
    output: &dyn OutputOperations,
    observer: &dyn BuildObserver,
) -> BuildReport {
    let files = match plan {
        Plan::NoFormats => {
            observer.on_event(&BuildEvent::NoFormats);
            return BuildReport {
                no_formats: true,
                ..BuildReport::default()
            };
        }
        Plan::Ready(files) => files,
    };

    files
        .par_iter()
        .map(|file| execute_file(file, converter, output, observer))
        .collect::<Vec<_>>()
        .into_iter()
        .fold(BuildReport::default(), |mut report, part| {
            report.absorb(part);
            report
        })
}

/// Plan and execute in one go
pub fn process(
    changes: &ChangeSet,
    settings: &BuildSettings,
    converter: &dyn Converter,
    output: &dyn OutputOperations,
    observer: &dyn BuildObserver,
) -> BuildReport {
    execute(&plan(changes, settings), converter, output, observer)
}

fn execute_file(
    file: &FilePlan,
    converter: &dyn Converter,
    output: &dyn OutputOperations,
    observer: &dyn BuildObserver,
) -> BuildReport {
    let mut report = BuildReport::default();
    let mut has_conversions = false;

    for action in &file.actions {
        match action {
            Action::Convert(job) => {
                has_conversions = true;
                observer.on_event(&BuildEvent::Converting {
                    source: job.source.clone(),
                    target: job.target.clone(),
                    format: job.format.clone(),
                });
                let result = output
                    .create_parent(&job.target)
                    .and_then(|()| converter.convert(job));
                match result {
                    Ok(()) => {
                        observer.on_event(&BuildEvent::Converted {
                            source: job.source.clone(),
                            target: job.target.clone(),
                        });
                        report.converted.push(job.target.clone());
                    }
                    Err(error) => {
                        observer.on_event(&BuildEvent::Failed {
                            source: job.source.clone(),
                            target: job.target.clone(),
                            message: error.to_string(),
                        });
                        report.failures.push(UnitFailure {
                            source: job.source.clone(),
                            target: job.target.clone(),
                            error,
                        });
                    }
                }
            }
            Action::Refuse(job) => {
                has_conversions = true;
                let error = Error::ReservedTarget {
                    source_path: job.source.clone(),
                    target_path: job.target.clone(),
                };
                observer.on_event(&BuildEvent::Failed {
                    source: job.source.clone(),
                    target: job.target.clone(),
                    message: error.to_string(),
                });
                report.failures.push(UnitFailure {
                    source: job.source.clone(),
                    target: job.target.clone(),
                    error,
                });
            }
            Action::Delete { target, .. } => {
                let event = match output.remove(target) {
                    Ok(()) => BuildEvent::Deleted {
                        target: target.clone(),
                    },
                    Err(e) if e.kind() == ErrorKind::NotFound => BuildEvent::AlreadyAbsent {
                        target: target.clone(),
                    },
                    Err(e) => BuildEvent::DeletionIgnored {
                        target: target.clone(),
                        message: e.to_string(),
                    },
                };
                observer.on_event(&event);
                report.deleted.push(target.clone());
            }
        }
    }

    if has_conversions && report.failures.is_empty() {
        report.completed_sources.push(file.source.clone());
    }
    observer.on_event(&BuildEvent::SourceFinished {
        source: file.source.clone(),
    });
    report
}
