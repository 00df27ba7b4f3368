//! Template kinds and the catalog mapping them to files.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::TemplateError;

/// Default marker names shared by the built-in templates.
pub const DEFAULT_MARKER_NAMES: &[&str] = &[
    "fecha_evento",
    "hora_evento",
    "lugar_evento",
    "referencia_evento",
];

/// Recognized template layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    /// Portrait A4 sheet.
    A4,
    /// Portrait 4x1 banner.
    FourByOne,
}

impl TemplateKind {
    /// Every recognized kind.
    pub const ALL: [Self; 2] = [Self::A4, Self::FourByOne];

    /// Identifier used in configuration and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A4 => "a4",
            Self::FourByOne => "4x1",
        }
    }

    /// File name of the bundled template for this kind.
    #[must_use]
    pub fn default_file_name(self) -> &'static str {
        match self {
            Self::A4 => "Formato a4.docx",
            Self::FourByOne => "Formato 4x1.docx",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateKind {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| TemplateError::InvalidTemplateKind(s.to_owned()))
    }
}

/// One template known to the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    /// Layout kind.
    pub kind: TemplateKind,
    /// File name inside the template directory.
    pub file_name: String,
    /// Marker names recognized in this template.
    pub marker_names: Vec<String>,
}

/// Fixed list of templates, built once by the caller and passed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateCatalog {
    dir: PathBuf,
    entries: Vec<TemplateEntry>,
}

impl TemplateCatalog {
    /// Create a catalog rooted at `dir`.
    #[must_use]
    pub fn new(dir: PathBuf, entries: Vec<TemplateEntry>) -> Self {
        Self { dir, entries }
    }

    /// Catalog with every kind, its default file name and the default markers.
    #[must_use]
    pub fn with_defaults(dir: PathBuf) -> Self {
        let entries = TemplateKind::ALL
            .into_iter()
            .map(|kind| TemplateEntry {
                kind,
                file_name: kind.default_file_name().to_owned(),
                marker_names: DEFAULT_MARKER_NAMES
                    .iter()
                    .map(|name| (*name).to_owned())
                    .collect(),
            })
            .collect();
        Self::new(dir, entries)
    }

    /// Template directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All entries in configuration order.
    #[must_use]
    pub fn entries(&self) -> &[TemplateEntry] {
        &self.entries
    }

    /// Look up a kind by identifier.
    ///
    /// Fails with [`TemplateError::InvalidTemplateKind`] when the identifier
    /// is unknown or the kind is not part of this catalog.
    pub fn entry(&self, kind: &str) -> Result<&TemplateEntry, TemplateError> {
        let kind: TemplateKind = kind.parse()?;
        self.entries
            .iter()
            .find(|entry| entry.kind == kind)
            .ok_or_else(|| TemplateError::InvalidTemplateKind(kind.to_string()))
    }

    /// Full path of an entry's template file.
    #[must_use]
    pub fn path_of(&self, entry: &TemplateEntry) -> PathBuf {
        self.dir.join(&entry.file_name)
    }
}
