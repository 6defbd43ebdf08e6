//! # Configuration Schema and Parsing
//!
//! This module defines the structure of the `.pandoc-sync.yaml` configuration
//! file and turns it into validated [`BuildSettings`].
//!
//! ## Format
//!
//! ```yaml
//! sources:
//!   - docs                      # a directory or a single file
//!   - path: notes               # same, in table form
//! output_dir: build/docs
//! formats:
//!   - html                      # extension defaults to the format name
//!   - name: latex
//!     extension: pdf
//! separate_output: true         # one subdirectory per format
//! converter_path: tools/pandoc  # optional, defaults to `pandoc` on PATH
//! include: ["**/*.md"]
//! exclude: ["drafts/**"]
//! ```
//!
//! Every key is optional. `sources` defaults to `docs` and `output_dir` to
//! `build/docs`. A configuration without formats is valid but produces no
//! output; builds report this instead of failing.
//!
//! ## Validation
//!
//! [`Config::into_settings`] resolves relative paths against the directory
//! holding the configuration file, rejects duplicate formats, rejects format
//! combinations that would overwrite each other in a flat layout, and
//! compiles the include/exclude patterns.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::defaults::{default_output_dir, default_separate_output, default_sources};
use crate::error::{Error, Result};
use crate::filter::SourceFilter;
use crate::format::{FormatSet, LayoutMode, OutputFormat};
use crate::path::normalize;
use crate::settings::BuildSettings;

/// A configured source: a directory or a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceSpec {
    /// Plain path
    Path(PathBuf),
    /// Table form, `{ path: ... }`
    Table { path: PathBuf },
}

impl SourceSpec {
    pub fn path(&self) -> &Path {
        match self {
            SourceSpec::Path(path) | SourceSpec::Table { path } => path,
        }
    }
}

impl From<PathBuf> for SourceSpec {
    fn from(path: PathBuf) -> Self {
        SourceSpec::Path(path)
    }
}

/// A configured output format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormatSpec {
    /// Writer name only; the extension is the same as the name
    Name(String),
    /// Writer name with an explicit extension
    Table {
        name: String,
        #[serde(default)]
        extension: Option<String>,
    },
}

impl FormatSpec {
    pub fn to_format(&self) -> OutputFormat {
        match self {
            FormatSpec::Name(name)
            | FormatSpec::Table {
                name,
                extension: None,
            } => OutputFormat::named(name.clone()),
            FormatSpec::Table {
                name,
                extension: Some(extension),
            } => OutputFormat::new(name.clone(), extension.clone()),
        }
    }
}

/// The parsed configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directories or files to convert
    #[serde(default = "default_source_specs")]
    pub sources: Vec<SourceSpec>,
    /// Root directory for converted files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Output formats, in conversion order
    #[serde(default)]
    pub formats: Vec<FormatSpec>,
    /// Whether each format gets its own subdirectory
    #[serde(default = "default_separate_output")]
    pub separate_output: bool,
    /// Converter executable; `None` looks up `pandoc` on PATH
    #[serde(default)]
    pub converter_path: Option<PathBuf>,
    /// Glob patterns a source must match (all files when empty)
    #[serde(default)]
    pub include: Vec<String>,
    /// Glob patterns excluding sources
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_source_specs() -> Vec<SourceSpec> {
    default_sources().into_iter().map(SourceSpec::from).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: default_source_specs(),
            output_dir: default_output_dir(),
            formats: Vec::new(),
            separate_output: default_separate_output(),
            converter_path: None,
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

impl Config {
    /// Output formats in configuration order
    pub fn output_formats(&self) -> Vec<OutputFormat> {
        self.formats.iter().map(FormatSpec::to_format).collect()
    }

    pub fn layout(&self) -> LayoutMode {
        LayoutMode::from_separate(self.separate_output)
    }

    /// Validate and freeze the configuration
    ///
    /// Relative paths are resolved against `base_dir`, normally the directory
    /// containing the configuration file. A bare converter name (no path
    /// separator) is left for `PATH` lookup.
    pub fn into_settings(self, base_dir: &Path) -> Result<BuildSettings> {
        for format in &self.formats {
            let format = format.to_format();
            if format.name.trim().is_empty() {
                return Err(Error::ConfigParse {
                    message: "Output format with an empty name".to_string(),
                    hint: Some("Every entry under 'formats:' needs a pandoc writer name".to_string()),
                });
            }
        }

        let formats = FormatSet::new(self.output_formats())?;
        let filter = SourceFilter::new(&self.include, &self.exclude)?;
        let sources = self
            .sources
            .iter()
            .map(|s| normalize(&base_dir.join(s.path())))
            .collect();
        let output_dir = normalize(&base_dir.join(&self.output_dir));
        let converter_path = self.converter_path.map(|p| {
            if p.components().count() > 1 {
                normalize(&base_dir.join(p))
            } else {
                p
            }
        });

        BuildSettings::new(
            sources,
            filter,
            output_dir,
            formats,
            LayoutMode::from_separate(self.separate_output),
            converter_path,
        )
    }
}

/// Parses a YAML string into a [`Config`].
///
/// An empty document (or one holding only comments) yields the defaults.
pub fn parse(yaml_content: &str) -> Result<Config> {
    let meaningful = yaml_content
        .lines()
        .any(|line| !line.trim().is_empty() && !line.trim_start().starts_with('#'));
    if !meaningful {
        return Ok(Config::default());
    }

    serde_yaml::from_str(yaml_content).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
        hint: hint_for(&e.to_string()),
    })
}

fn hint_for(message: &str) -> Option<String> {
    if message.contains("unknown field") {
        Some(
            "Valid keys are sources, output_dir, formats, separate_output, converter_path, include and exclude"
                .to_string(),
        )
    } else if message.contains("did not match any variant of untagged enum FormatSpec") {
        Some("A format is either a name like 'html' or a table with 'name' and 'extension'".to_string())
    } else {
        None
    }
}

/// Read and parse a configuration file
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
sources:
  - docs
  - path: notes
output_dir: out
formats:
  - html
  - name: latex
    extension: pdf
separate_output: false
converter_path: /opt/pandoc/bin/pandoc
include: ["**/*.md"]
exclude: ["drafts/**"]
"#;
        let config = parse(yaml).unwrap();
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.sources[0].path(), Path::new("docs"));
        assert_eq!(config.sources[1].path(), Path::new("notes"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(
            config.output_formats(),
            vec![OutputFormat::named("html"), OutputFormat::new("latex", "pdf")]
        );
        assert_eq!(config.layout(), LayoutMode::Flat);
        assert_eq!(
            config.converter_path,
            Some(PathBuf::from("/opt/pandoc/bin/pandoc"))
        );
        assert_eq!(config.include, vec!["**/*.md"]);
        assert_eq!(config.exclude, vec!["drafts/**"]);
    }

    #[test]
    fn test_parse_defaults() {
        let config = parse("formats: [html]").unwrap();
        assert_eq!(config.sources, vec![SourceSpec::Path(PathBuf::from("docs"))]);
        assert_eq!(config.output_dir, PathBuf::from("build/docs"));
        assert!(config.separate_output);
        assert!(config.converter_path.is_none());
    }

    #[test]
    fn test_parse_empty_document() {
        assert_eq!(parse("").unwrap(), Config::default());
        assert_eq!(parse("# just a comment\n\n").unwrap(), Config::default());
    }

    #[test]
    fn test_table_format_without_extension() {
        let config = parse("formats:\n  - name: docx\n").unwrap();
        assert_eq!(config.output_formats(), vec![OutputFormat::named("docx")]);
    }

    #[test]
    fn test_parse_unknown_field_has_hint() {
        let err = parse("formatz: [html]").unwrap_err();
        let display = err.to_string();
        assert!(display.contains("Configuration parsing error"));
        assert!(display.contains("formatz"));
        assert!(display.contains("hint:"));
    }

    #[test]
    fn test_parse_invalid_yaml() {
        assert!(matches!(
            parse("formats: [unclosed"),
            Err(Error::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_into_settings_resolves_relative_paths() {
        let config = parse("sources: [docs]\noutput_dir: build/out\nformats: [html]").unwrap();
        let settings = config.into_settings(Path::new("/proj")).unwrap();
        assert_eq!(settings.sources, vec![PathBuf::from("/proj/docs")]);
        assert_eq!(settings.output_dir, PathBuf::from("/proj/build/out"));
        assert_eq!(settings.layout, LayoutMode::Separate);
    }

    #[test]
    fn test_into_settings_keeps_absolute_paths() {
        let config = parse("sources: [/abs/docs]\noutput_dir: /abs/out").unwrap();
        let settings = config.into_settings(Path::new("/proj")).unwrap();
        assert_eq!(settings.sources, vec![PathBuf::from("/abs/docs")]);
        assert_eq!(settings.output_dir, PathBuf::from("/abs/out"));
    }

    #[test]
    fn test_into_settings_converter_path() {
        let bare = parse("converter_path: pandoc3").unwrap();
        assert_eq!(
            bare.into_settings(Path::new("/proj")).unwrap().converter_path,
            Some(PathBuf::from("pandoc3"))
        );

        let relative = parse("converter_path: tools/pandoc").unwrap();
        assert_eq!(
            relative.into_settings(Path::new("/proj")).unwrap().converter_path,
            Some(PathBuf::from("/proj/tools/pandoc"))
        );
    }

    #[test]
    fn test_into_settings_rejects_duplicate_formats() {
        let config = parse("formats:\n  - html\n  - name: html\n    extension: html\n").unwrap();
        assert!(matches!(
            config.into_settings(Path::new("/proj")),
            Err(Error::DuplicateFormat { .. })
        ));
    }

    #[test]
    fn test_into_settings_rejects_flat_collision() {
        let yaml = r#"
separate_output: false
formats:
  - { name: latex, extension: pdf }
  - { name: context, extension: pdf }
"#;
        let config = parse(yaml).unwrap();
        assert!(matches!(
            config.into_settings(Path::new("/proj")),
            Err(Error::FlatLayoutCollision { .. })
        ));
    }

    #[test]
    fn test_into_settings_rejects_empty_format_name() {
        let config = parse("formats: ['']").unwrap();
        assert!(matches!(
            config.into_settings(Path::new("/proj")),
            Err(Error::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_into_settings_rejects_bad_glob() {
        let config = parse("include: ['[unclosed']").unwrap();
        assert!(matches!(
            config.into_settings(Path::new("/proj")),
            Err(Error::Glob(_))
        ));
    }

    #[test]
    fn test_into_settings_allows_no_formats() {
        let settings = Config::default().into_settings(Path::new("/proj")).unwrap();
        assert!(settings.formats.is_empty());
    }

    #[test]
    fn test_from_file_missing() {
        assert!(matches!(
            from_file("/nonexistent/.pandoc-sync.yaml"),
            Err(Error::Io(_))
        ));
    }
}
