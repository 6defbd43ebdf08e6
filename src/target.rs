//! Target path resolution
//!
//! Maps a source file to the file a given output format is written to. The
//! mapping is a pure function of its inputs.

use std::path::{Path, PathBuf};

use crate::format::{LayoutMode, OutputFormat};
use crate::path::{change_extension, relativize};

/// Resolve the target path of `source` for `format`
///
/// `source` is relativized against `base_dir`, placed under `output_root`
/// (inside the format's own subdirectory for [`LayoutMode::Separate`]) and
/// given the format's extension.
///
/// ```
/// use std::path::Path;
/// use pandoc_sync::format::{LayoutMode, OutputFormat};
/// use pandoc_sync::target::resolve;
///
/// let target = resolve(
///     Path::new("/proj/docs/guide.md"),
///     Path::new("/proj/docs"),
///     Path::new("/proj/build/docs"),
///     &OutputFormat::new("latex", "pdf"),
///     LayoutMode::Separate,
/// );
/// assert_eq!(target, Path::new("/proj/build/docs/latex-pdf/guide.pdf"));
/// ```
pub fn resolve(
    source: &Path,
    base_dir: &Path,
    output_root: &Path,
    format: &OutputFormat,
    layout: LayoutMode,
) -> PathBuf {
    // Callers guarantee `source` is under `base_dir`; keep the file name if not
    let relative = relativize(base_dir, source)
        .or_else(|| source.file_name().map(PathBuf::from))
        .unwrap_or_default();

    let base = match layout {
        LayoutMode::Separate => output_root.join(format.dir_name()),
        LayoutMode::Flat => output_root.to_path_buf(),
    };

    change_extension(&base.join(relative), &format.extension)
}
