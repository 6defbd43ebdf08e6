//! Build event reporting
//!
//! The processor does not log directly. It reports [`BuildEvent`]s to the
//! [`BuildObserver`] it was given, so callers decide where diagnostics go:
//! [`LogObserver`] forwards them to the `log` facade, the CLI adds a progress
//! bar on top, and tests record them.

use std::path::PathBuf;

use log::{debug, info, warn};

use crate::format::OutputFormat;

/// Something that happened while executing a build plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    /// No output formats are configured; nothing will be produced
    NoFormats,
    /// A conversion unit is about to run
    Converting {
        source: PathBuf,
        target: PathBuf,
        format: OutputFormat,
    },
    /// A conversion unit finished successfully
    Converted { source: PathBuf, target: PathBuf },
    /// A conversion unit failed
    Failed {
        source: PathBuf,
        target: PathBuf,
        message: String,
    },
    /// The target of a removed source was deleted
    Deleted { target: PathBuf },
    /// The target of a removed source did not exist
    AlreadyAbsent { target: PathBuf },
    /// Deleting a stale target failed; the build carries on regardless
    DeletionIgnored { target: PathBuf, message: String },
    /// All units of one source file have been handled
    SourceFinished { source: PathBuf },
}

/// Receiver of build events
///
/// Observers are shared between worker threads.
pub trait BuildObserver: Send + Sync {
    fn on_event(&self, event: &BuildEvent);
}

/// Observer that forwards every event to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl BuildObserver for LogObserver {
    fn on_event(&self, event: &BuildEvent) {
        match event {
            BuildEvent::NoFormats => warn!("No output format configured, no output produced"),
            BuildEvent::Converting {
                source,
                target,
                format,
            } => debug!(
                "Converting {} to {} ({})",
                source.display(),
                target.display(),
                format
            ),
            BuildEvent::Converted { target, .. } => info!("Created {}", target.display()),
            BuildEvent::Failed {
                source, message, ..
            } => warn!("Failed to convert {}: {}", source.display(), message),
            BuildEvent::Deleted { target } => info!("Deleted {}", target.display()),
            BuildEvent::AlreadyAbsent { target } => {
                debug!("{} already absent", target.display())
            }
            BuildEvent::DeletionIgnored { target, message } => {
                warn!("Could not delete {}: {}", target.display(), message)
            }
            BuildEvent::SourceFinished { .. } => {}
        }
    }
}

/// Observer that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl BuildObserver for NullObserver {
    fn on_event(&self, _event: &BuildEvent) {}
}
