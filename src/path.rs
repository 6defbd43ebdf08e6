//! Path manipulation utilities for pandoc-sync
//!
//! All functions here are pure: they never touch the filesystem.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Remove the last extension from the file name of `path`
///
/// A file name whose only dot is its first character (a dotfile such as
/// `.cmdrc`) has no extension and is returned unchanged. So is a name without
/// any dot, or one ending in a dot.
///
/// ```
/// use std::path::Path;
/// use pandoc_sync::path::strip_extension;
///
/// assert_eq!(strip_extension(Path::new("/docs/guide.md")), Path::new("/docs/guide"));
/// assert_eq!(strip_extension(Path::new("/home/.cmdrc")), Path::new("/home/.cmdrc"));
/// assert_eq!(strip_extension(Path::new("archive.tar.gz")), Path::new("archive.tar"));
/// ```
pub fn strip_extension(path: &Path) -> PathBuf {
    match (path.file_stem(), path.extension()) {
        // `file.` has an empty extension and nothing to strip
        (Some(stem), Some(ext)) if !ext.is_empty() => path.with_file_name(stem),
        _ => path.to_path_buf(),
    }
}

/// Replace the last extension of the file name of `path` with `ext`
///
/// Equivalent to [`strip_extension`] followed by appending `.ext`. The
/// extension is not validated: an empty `ext` leaves a trailing dot.
pub fn change_extension(path: &Path, ext: &str) -> PathBuf {
    let stripped = strip_extension(path);
    let mut name = stripped
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(OsString::new);
    name.push(".");
    name.push(ext);
    stripped.with_file_name(name)
}

/// Whether `path` lies inside `root`, compared by whole path components
///
/// `/foo/barbaz/a.md` is not inside `/foo/bar`. A path is not considered a
/// descendant of itself.
pub fn is_descendant(path: &Path, root: &Path) -> bool {
    path != root && path.starts_with(root)
}

/// Compute `path` relative to `base`
///
/// Returns `None` when `path` does not lie under `base`.
pub fn relativize(base: &Path, path: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(Path::to_path_buf)
}

/// Lexically normalize a path by dropping `.` components and folding `..`
///
/// Symlinks are not resolved, so the result may differ from
/// `std::fs::canonicalize` when links are involved. Used to compare
/// configured roots with discovered files without requiring them to exist.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Render a path with forward slashes for glob matching
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
