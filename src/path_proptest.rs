//! Property-based tests for path manipulation and target resolution.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::format::{LayoutMode, OutputFormat};
    use crate::path::{change_extension, is_descendant, normalize, strip_extension};
    use crate::target::resolve;
    use proptest::prelude::*;
    use std::path::{Path, PathBuf};

    /// Directory part of a generated path
    fn dir_strategy() -> impl Strategy<Value = PathBuf> {
        prop::collection::vec("[a-z][a-z0-9_-]{0,6}", 0..4)
            .prop_map(|parts| parts.iter().collect::<PathBuf>())
    }

    /// File names with at most one extension, plus dotfiles
    ///
    /// A name like `a.tar.gz` loses one extension per strip, so idempotence
    /// only holds for names carrying a single one.
    fn file_name_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-z][a-z0-9_-]{0,7}",
            "[a-z][a-z0-9_-]{0,7}\\.[a-z0-9]{1,4}",
            "\\.[a-z][a-z0-9]{0,6}",
        ]
    }

    fn format_strategy() -> impl Strategy<Value = OutputFormat> {
        ("[a-z]{1,8}", "[a-z]{1,4}").prop_map(|(name, ext)| OutputFormat::new(name, ext))
    }

    fn layout_strategy() -> impl Strategy<Value = LayoutMode> {
        prop_oneof![Just(LayoutMode::Separate), Just(LayoutMode::Flat)]
    }

    // ============================================================================
    // strip_extension property tests
    // ============================================================================

    proptest! {
        /// Property: stripping twice is the same as stripping once
        #[test]
        fn strip_extension_is_idempotent(dir in dir_strategy(), name in file_name_strategy()) {
            let path = dir.join(name);
            let once = strip_extension(&path);
            prop_assert_eq!(strip_extension(&once), once);
        }

        /// Property: dotfiles without a further extension are left alone
        #[test]
        fn strip_extension_preserves_dotfiles(dir in dir_strategy(), name in "\\.[a-z][a-z0-9]{0,6}") {
            let path = dir.join(&name);
            prop_assert_eq!(strip_extension(&path), path);
        }

        /// Property: the parent directory never changes
        #[test]
        fn strip_extension_keeps_parent(dir in dir_strategy(), name in file_name_strategy()) {
            let path = dir.join(name);
            let stripped = strip_extension(&path);
            prop_assert_eq!(stripped.parent(), path.parent());
        }
    }

    // ============================================================================
    // change_extension property tests
    // ============================================================================

    proptest! {
        /// Property: the result always ends with `.ext`
        #[test]
        fn change_extension_ends_with_ext(
            dir in dir_strategy(),
            name in file_name_strategy(),
            ext in "[a-z0-9]{1,5}",
        ) {
            let changed = change_extension(&dir.join(name), &ext);
            let file_name = changed.file_name().unwrap().to_string_lossy().into_owned();
            let suffix = format!(".{}", ext);
            prop_assert!(file_name.ends_with(&suffix));
        }

        /// Property: a single extension is replaced, not appended to
        #[test]
        fn change_extension_replaces_single_extension(
            dir in dir_strategy(),
            stem in "[a-z][a-z0-9]{0,7}",
            old in "[a-z0-9]{1,4}",
            new in "[a-z0-9]{1,4}",
        ) {
            let path = dir.join(format!("{}.{}", stem, old));
            prop_assert_eq!(change_extension(&path, &new), dir.join(format!("{}.{}", stem, new)));
        }
    }

    // ============================================================================
    // resolve property tests
    // ============================================================================

    proptest! {
        /// Property: resolution is a pure function of its inputs
        #[test]
        fn resolve_is_deterministic(
            rel_dir in dir_strategy(),
            name in file_name_strategy(),
            format in format_strategy(),
            layout in layout_strategy(),
        ) {
            let base = Path::new("/proj/docs");
            let root = Path::new("/proj/build");
            let source = base.join(rel_dir).join(name);
            prop_assert_eq!(
                resolve(&source, base, root, &format, layout),
                resolve(&source, base, root, &format, layout)
            );
        }

        /// Property: every target lands inside the output root
        #[test]
        fn resolve_stays_under_output_root(
            rel_dir in dir_strategy(),
            name in file_name_strategy(),
            format in format_strategy(),
            layout in layout_strategy(),
        ) {
            let base = Path::new("/proj/docs");
            let root = Path::new("/proj/build");
            let source = base.join(rel_dir).join(name);
            let target = resolve(&source, base, root, &format, layout);
            prop_assert!(is_descendant(&normalize(&target), root));
        }

        /// Property: under the separate layout, the first component below the
        /// output root is the format's directory
        #[test]
        fn resolve_separate_uses_format_dir(
            rel_dir in dir_strategy(),
            name in file_name_strategy(),
            format in format_strategy(),
        ) {
            let base = Path::new("/proj/docs");
            let root = Path::new("/proj/build");
            let source = base.join(rel_dir).join(name);
            let target = resolve(&source, base, root, &format, LayoutMode::Separate);
            let first = target.strip_prefix(root).unwrap().components().next().unwrap();
            prop_assert_eq!(first.as_os_str().to_string_lossy(), format.dir_name());
        }
    }
}
