//! Source discovery
//!
//! Walks every configured source with `walkdir` and keeps the files accepted
//! by the include/exclude filter. A configured source may be a directory (all
//! files below it are candidates) or a single file (the file alone is a
//! candidate, matched relative to its parent directory).
//!
//! The result is sorted and free of duplicates, so overlapping sources list
//! each file once. Anything inside the output directory is skipped, so an
//! output directory nested in a source tree never feeds back into the build.
//! Entries the walk cannot read, such as dangling symlinks or link loops, are
//! skipped with a warning.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::error::Result;
use crate::path::{normalize, relativize};
use crate::settings::BuildSettings;

/// Discover every source file selected by `settings`
pub fn discover(settings: &BuildSettings) -> Result<Vec<PathBuf>> {
    let mut found = BTreeSet::new();
    let output_dir = normalize(&settings.output_dir);

    for source in &settings.sources {
        let source = normalize(source);
        if source.is_file() {
            let base = source.parent().unwrap_or(&source);
            if accepted(settings, base, &source) {
                found.insert(source.clone());
            }
            continue;
        }
        if !source.exists() {
            warn!("Source {} does not exist, skipping", source.display());
            continue;
        }

        debug!("Scanning {}", source.display());
        let walker = WalkDir::new(&source)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| !e.path().starts_with(&output_dir));
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = normalize(entry.path());
            if accepted(settings, &source, &path) {
                found.insert(path);
            }
        }
    }

    debug!("Discovered {} source files", found.len());
    Ok(found.into_iter().collect())
}

fn accepted(settings: &BuildSettings, base: &Path, path: &Path) -> bool {
    match relativize(base, path) {
        Some(relative) => settings.filter.accepts(&relative),
        None => false,
    }
}
