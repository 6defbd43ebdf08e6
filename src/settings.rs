//! Frozen build settings
//!
//! [`BuildSettings`] is the validated, immutable form of the configuration
//! that every later stage borrows. It is produced by
//! [`Config::into_settings`](crate::config::Config::into_settings) or, in
//! tests and embedding code, by [`BuildSettings::new`].

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::defaults::{DEFAULT_CONVERTER, STATE_FILE_NAME};
use crate::error::Result;
use crate::filter::SourceFilter;
use crate::format::{FormatSet, LayoutMode, OutputFormat};
use crate::roots::SourceRoots;
use crate::target;

/// Everything a build needs to know, fixed before execution starts
#[derive(Debug, Clone)]
pub struct BuildSettings {
    /// Configured source paths, directories or single files
    pub sources: Vec<PathBuf>,
    /// Roots used to relativize sources
    pub roots: SourceRoots,
    pub filter: SourceFilter,
    pub output_dir: PathBuf,
    pub formats: FormatSet,
    pub layout: LayoutMode,
    /// Converter override; `None` runs `pandoc` from `PATH`
    pub converter_path: Option<PathBuf>,
}

impl BuildSettings {
    /// Assemble settings, checking the formats against the layout
    ///
    /// Each source directory is its own root. A source that is a single file
    /// contributes its parent directory as root.
    pub fn new(
        sources: Vec<PathBuf>,
        filter: SourceFilter,
        output_dir: PathBuf,
        formats: FormatSet,
        layout: LayoutMode,
        converter_path: Option<PathBuf>,
    ) -> Result<Self> {
        formats.check_layout(layout)?;
        let roots = SourceRoots::new(sources.iter().map(|source| {
            if source.is_file() {
                source.parent().unwrap_or(source).to_path_buf()
            } else {
                source.clone()
            }
        }));
        Ok(Self {
            sources,
            roots,
            filter,
            output_dir,
            formats,
            layout,
            converter_path,
        })
    }

    /// Program name or path used to run the converter
    pub fn converter_program(&self) -> PathBuf {
        self.converter_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONVERTER))
    }

    /// Location of the build state snapshot, inside the output directory
    ///
    /// No target may resolve to this path; see [`crate::processor::plan`].
    pub fn state_path(&self) -> PathBuf {
        self.output_dir.join(STATE_FILE_NAME)
    }

    /// Target path of `source` for `format`, relativized against its owning root
    pub fn target_for(&self, source: &Path, format: &OutputFormat) -> PathBuf {
        let located = self.roots.locate(source);
        target::resolve(
            source,
            located.base_dir(),
            &self.output_dir,
            format,
            self.layout,
        )
    }

    /// Target paths of `source` for every format, in format order
    pub fn targets_for(&self, source: &Path) -> Vec<(OutputFormat, PathBuf)> {
        let located = self.roots.locate(source);
        self.formats
            .iter()
            .map(|format| {
                let target = target::resolve(
                    source,
                    located.base_dir(),
                    &self.output_dir,
                    format,
                    self.layout,
                );
                (format.clone(), target)
            })
            .collect()
    }

    /// Stable text identifying every setting that influences target paths
    /// or their content
    ///
    /// A build whose fingerprint differs from the previous one cannot reuse
    /// its results and runs non-incrementally.
    pub fn fingerprint(&self) -> String {
        #[derive(Serialize)]
        struct Fingerprint<'a> {
            roots: Vec<&'a Path>,
            includes: Vec<&'a str>,
            excludes: Vec<&'a str>,
            output_dir: &'a Path,
            formats: &'a FormatSet,
            layout: LayoutMode,
            converter: PathBuf,
        }

        let fingerprint = Fingerprint {
            roots: self.roots.iter().collect(),
            includes: self.filter.includes().collect(),
            excludes: self.filter.excludes().collect(),
            output_dir: &self.output_dir,
            formats: &self.formats,
            layout: self.layout,
            converter: self.converter_program(),
        };
        // Serializing plain strings and paths cannot fail
        serde_json::to_string(&fingerprint).unwrap_or_default()
    }
}
