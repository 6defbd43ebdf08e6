//! Shared test utilities for the E2E tests.
//!
//! Provides a temporary project directory with a configuration file, source
//! documents and, on unix, a fake converter script standing in for pandoc.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new()
//!         .with_fake_converter()
//!         .with_config(configs::HTML_AND_PDF)
//!         .with_file("docs/guide.md", "# Guide");
//!     fixture.command_with_config().arg("build").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    pub use super::TestFixture;
}

/// Common configuration YAML snippets for testing.
///
/// Configurations that build reference `bin/fake-pandoc`, installed by
/// [`TestFixture::with_fake_converter`](super::TestFixture::with_fake_converter).
#[allow(dead_code)]
pub mod configs {
    /// HTML plus LaTeX written as `.pdf`, separate layout.
    pub const HTML_AND_PDF: &str = r#"
sources: [docs]
output_dir: out
converter_path: bin/fake-pandoc
formats:
  - html
  - name: latex
    extension: pdf
"#;

    /// Same formats written side by side into the output root.
    pub const FLAT: &str = r#"
sources: [docs]
output_dir: out
converter_path: bin/fake-pandoc
separate_output: false
formats:
  - html
  - name: latex
    extension: pdf
"#;

    /// Only markdown outside `drafts/`.
    pub const FILTERED: &str = r#"
sources: [docs]
output_dir: out
converter_path: bin/fake-pandoc
formats: [html]
include: ["**/*.md"]
exclude: ["drafts/**"]
"#;

    /// Valid configuration without any output format.
    pub const NO_FORMATS: &str = r#"
sources: [docs]
output_dir: out
converter_path: bin/fake-pandoc
"#;

    /// Two formats with the same name and extension.
    pub const DUPLICATE_FORMATS: &str = r#"
formats:
  - html
  - { name: html, extension: html }
"#;

    /// Two formats producing `.pdf` files in a flat layout.
    pub const FLAT_COLLISION: &str = r#"
separate_output: false
formats:
  - { name: latex, extension: pdf }
  - { name: context, extension: pdf }
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "formats: [unclosed";
}

/// Script standing in for pandoc.
///
/// Writes `[format]` followed by the source content to the target, appends
/// `source format` to `calls.log` next to the script's `bin/` directory and
/// fails for any source whose path contains `fail`.
const FAKE_CONVERTER: &str = r#"#!/bin/sh
src="$2"
for arg in "$@"; do
  case "$arg" in
    --to=*) to="${arg#--to=}" ;;
    --output=*) out="${arg#--output=}" ;;
  esac
done
here="$(dirname "$0")"
echo "$src $to" >> "$here/../calls.log"
case "$src" in
  *fail*) echo "cannot convert $src" >&2; exit 3 ;;
esac
echo "[$to]" > "$out"
cat "$src" >> "$out"
"#;

/// A temporary project directory.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a `.pandoc-sync.yaml` configuration file with the given content.
    pub fn with_config(self, content: &str) -> Self {
        self.temp_dir
            .child(".pandoc-sync.yaml")
            .write_str(content)
            .expect("Failed to write config file");
        self
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.write(path, content);
        self
    }

    /// Install the fake converter as `bin/fake-pandoc`.
    #[cfg(unix)]
    #[allow(dead_code)]
    pub fn with_fake_converter(self) -> Self {
        use std::os::unix::fs::PermissionsExt;

        let script = self.path().join("bin").join("fake-pandoc");
        fs::create_dir_all(script.parent().unwrap()).unwrap();
        fs::write(&script, FAKE_CONVERTER).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        self
    }

    /// Write or overwrite a file, creating parent directories.
    #[allow(dead_code)]
    pub fn write(&self, path: &str, content: &str) {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
    }

    /// Rewrite a file and move its modification time into the future so the
    /// change is seen regardless of timestamp granularity.
    #[allow(dead_code)]
    pub fn modify(&self, path: &str, content: &str) {
        self.write(path, content);
        let file = fs::File::options()
            .write(true)
            .open(self.path().join(path))
            .unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(5))
            .unwrap();
    }

    /// Delete a file.
    #[allow(dead_code)]
    pub fn remove(&self, path: &str) {
        fs::remove_file(self.path().join(path)).unwrap();
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the config file.
    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join(".pandoc-sync.yaml")
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Converter invocations so far, as sorted `source format` lines with
    /// paths relative to the fixture.
    #[allow(dead_code)]
    pub fn calls(&self) -> Vec<String> {
        let log = self.path().join("calls.log");
        let content = fs::read_to_string(log).unwrap_or_default();
        let prefix = format!("{}/", self.path().display());
        let mut calls: Vec<String> = content
            .lines()
            .map(|line| line.replace(&prefix, ""))
            .collect();
        calls.sort();
        calls
    }

    /// Forget recorded converter invocations.
    #[allow(dead_code)]
    pub fn clear_calls(&self) {
        let _ = fs::remove_file(self.path().join("calls.log"));
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("pandoc-sync");
        cmd.current_dir(self.path()).env_remove("PANDOC_SYNC_CONFIG");
        cmd
    }

    /// `pandoc-sync <subcommand> --color never --config <fixture config>`
    #[allow(dead_code)]
    pub fn run(&self, subcommand: &str) -> assert_cmd::Command {
        let mut cmd = self.command();
        cmd.arg(subcommand)
            .arg("--color")
            .arg("never")
            .arg("--config")
            .arg(self.config_path());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_with_config() {
        let fixture = TestFixture::new().with_config("formats: [html]");
        assert!(fixture.config_path().exists());
    }

    #[test]
    fn test_configs_are_valid_yaml() {
        let configs = [
            configs::HTML_AND_PDF,
            configs::FLAT,
            configs::FILTERED,
            configs::NO_FORMATS,
            configs::DUPLICATE_FORMATS,
            configs::FLAT_COLLISION,
        ];

        for config in configs {
            serde_yaml::from_str::<serde_yaml::Value>(config).expect("Config should be valid YAML");
        }
    }

    #[test]
    fn test_invalid_yaml_is_actually_invalid() {
        let result = serde_yaml::from_str::<serde_yaml::Value>(configs::INVALID_YAML);
        assert!(result.is_err(), "INVALID_YAML should not parse");
    }
}
