//! Output formats and output layout
//!
//! An [`OutputFormat`] pairs a pandoc writer name with the file extension the
//! produced files carry. A task holds an immutable, insertion-ordered
//! [`FormatSet`] that is validated once when it is built.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A conversion target: the converter's writer name plus the output extension
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputFormat {
    /// Writer name understood by the converter (`html`, `latex`, `docx`, ...)
    pub name: String,
    /// Extension of the produced files, without the leading dot
    pub extension: String,
}

impl OutputFormat {
    pub fn new(name: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extension: extension.into(),
        }
    }

    /// A format whose extension equals its name, e.g. `html` -> `.html`
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            extension: name.clone(),
            name,
        }
    }

    /// Name of the per-format subdirectory used by the separate layout
    ///
    /// `html`/`html` maps to `html`, `latex`/`pdf` maps to `latex-pdf`, so two
    /// writers producing the same extension never share a directory.
    pub fn dir_name(&self) -> String {
        if self.name == self.extension {
            self.name.clone()
        } else {
            format!("{}-{}", self.name, self.extension)
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name == self.extension {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} (.{})", self.name, self.extension)
        }
    }
}

/// How converted files are arranged under the output root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// One subdirectory per output format
    #[default]
    Separate,
    /// All formats share the output root; extensions alone tell them apart
    Flat,
}

impl LayoutMode {
    pub fn from_separate(separate: bool) -> Self {
        if separate {
            LayoutMode::Separate
        } else {
            LayoutMode::Flat
        }
    }
}

/// Ordered, duplicate-free collection of output formats
///
/// Built once and never mutated afterwards. An empty set is allowed: it is
/// reported by the processor as "no output produced" rather than rejected here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormatSet {
    formats: Vec<OutputFormat>,
}

impl FormatSet {
    /// Build a set, rejecting any (name, extension) pair given twice
    pub fn new(formats: Vec<OutputFormat>) -> Result<Self> {
        for (i, format) in formats.iter().enumerate() {
            if formats[..i].contains(format) {
                return Err(Error::DuplicateFormat {
                    format: format.name.clone(),
                    extension: format.extension.clone(),
                });
            }
        }
        Ok(Self { formats })
    }

    /// Check that every format can be written under `layout` without two
    /// formats producing the same file
    pub fn check_layout(&self, layout: LayoutMode) -> Result<()> {
        if layout == LayoutMode::Separate {
            return Ok(());
        }
        for (i, format) in self.formats.iter().enumerate() {
            if let Some(earlier) = self.formats[..i]
                .iter()
                .find(|f| f.extension == format.extension)
            {
                return Err(Error::FlatLayoutCollision {
                    first: earlier.name.clone(),
                    second: format.name.clone(),
                    extension: format.extension.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OutputFormat> {
        self.formats.iter()
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    /// Look up a format by writer name
    pub fn find(&self, name: &str) -> Option<&OutputFormat> {
        self.formats.iter().find(|f| f.name == name)
    }
}

impl<'a> IntoIterator for &'a FormatSet {
    type Item = &'a OutputFormat;
    type IntoIter = std::slice::Iter<'a, OutputFormat>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
