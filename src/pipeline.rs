//! Build pipeline
//!
//! Coordinates the stages of a build so callers get a single entry point:
//!
//! 1. **Discovery**: find every source file selected by the settings.
//! 2. **Change detection**: fingerprint the sources and compare them against
//!    the state saved by the previous build (unless a full build is forced).
//! 3. **Planning**: turn the change set into per-file actions.
//! 4. **Execution**: convert and delete (skipped for dry runs).
//! 5. **State update**: record the sources that are now up to date.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use log::{debug, info, warn};

use crate::changeset::ChangeSet;
use crate::converter::Converter;
use crate::discovery;
use crate::error::Result;
use crate::observer::BuildObserver;
use crate::processor::{self, BuildReport, OutputOperations, Plan};
use crate::settings::BuildSettings;
use crate::state::{self, BuildState, SourceFingerprint};

/// Switches controlling a single build
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Ignore previous state and convert every source
    pub full: bool,
    /// Plan only; touch nothing on disk
    pub dry_run: bool,
}

/// Everything a build decided and did
#[derive(Debug)]
pub struct BuildOutcome {
    pub changes: ChangeSet,
    pub plan: Plan,
    /// `None` for dry runs
    pub report: Option<BuildReport>,
}

/// Location of the persisted build state for `settings`
pub fn state_path(settings: &BuildSettings) -> PathBuf {
    settings.state_path()
}

/// Classify `files` against the previous build's state
///
/// Without usable history every file counts as added.
pub fn detect_changes(
    settings: &BuildSettings,
    files: Vec<PathBuf>,
    full: bool,
) -> Result<(ChangeSet, BTreeMap<PathBuf, SourceFingerprint>)> {
    let current = state::scan(&files)?;
    if full {
        debug!("Full build requested");
        return Ok((ChangeSet::full(files), current));
    }

    let previous = match BuildState::load(&state_path(settings)) {
        Ok(state) => state.and_then(|s| s.matching(&settings.fingerprint())),
        Err(e) => {
            warn!("{}; rebuilding everything", e);
            None
        }
    };

    let changes = match previous {
        Some(previous) => ChangeSet::classify(&previous.sources, &current),
        None => {
            info!("No previous build state, converting all documents");
            ChangeSet::full(files)
        }
    };
    Ok((changes, current))
}

/// Run a complete build
pub fn run(
    settings: &BuildSettings,
    options: BuildOptions,
    converter: &dyn Converter,
    output: &dyn OutputOperations,
    observer: &dyn BuildObserver,
) -> Result<BuildOutcome> {
    let files = discovery::discover(settings)?;
    let (changes, current) = detect_changes(settings, files, options.full)?;
    debug!(
        "{} added or modified, {} removed, {} up to date",
        changes.added_or_modified.len(),
        changes.removed.len(),
        changes.up_to_date.len()
    );

    let plan = processor::plan(&changes, settings);
    if options.dry_run {
        return Ok(BuildOutcome {
            changes,
            plan,
            report: None,
        });
    }

    let report = processor::execute(&plan, converter, output, observer);
    if !report.no_formats {
        let recorded = recorded_sources(&changes, &report, current);
        BuildState::new(settings.fingerprint(), recorded).save(&state_path(settings))?;
    }

    Ok(BuildOutcome {
        changes,
        plan,
        report: Some(report),
    })
}

/// Snapshot entries for every discovered source
///
/// Sources that were up to date or fully converted keep their fingerprint.
/// Anything else had a failing unit and is recorded dirty, so it is retried
/// while it exists and its targets are deleted once it is gone.
fn recorded_sources(
    changes: &ChangeSet,
    report: &BuildReport,
    mut current: BTreeMap<PathBuf, SourceFingerprint>,
) -> BTreeMap<PathBuf, SourceFingerprint> {
    let settled: BTreeSet<&PathBuf> = changes
        .up_to_date
        .iter()
        .chain(&report.completed_sources)
        .collect();
    for (path, fingerprint) in current.iter_mut() {
        if !settled.contains(path) {
            *fingerprint = fingerprint.into_dirty();
        }
    }
    current
}

/// Delete every target of every known source, plus the build state
///
/// Known sources are those discovered now and those recorded by the last
/// build, so targets of since-deleted sources go too. Returns the targets
/// that were (or, for a dry run, would be) deleted.
pub fn clean(
    settings: &BuildSettings,
    output: &dyn OutputOperations,
    dry_run: bool,
) -> Result<Vec<PathBuf>> {
    let state_file = state_path(settings);
    let mut sources = discovery::discover(settings)?;
    match BuildState::load(&state_file) {
        Ok(Some(state)) => sources.extend(state.sources.into_keys()),
        Ok(None) => {}
        Err(e) => warn!("{}", e),
    }
    sources.sort();
    sources.dedup();

    let mut removed = Vec::new();
    for source in &sources {
        for (_, target) in settings.targets_for(source) {
            if !target.exists() {
                continue;
            }
            if !dry_run {
                if let Err(e) = output.remove(&target) {
                    warn!("Could not delete {}: {}", target.display(), e);
                    continue;
                }
            }
            removed.push(target);
        }
    }

    if !dry_run {
        BuildState::remove(&state_file)?;
    }
    Ok(removed)
}
