//! Boundary layer: resolves template files and writes filled copies.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use placard_docx::DocxPackage;

use crate::driver::{ApplyReport, apply};
use crate::error::TemplateError;
use crate::kind::{TemplateCatalog, TemplateEntry};
use crate::marker::MarkerSet;
use crate::scan::scan_markers;

/// Fills catalog templates with marker values.
#[derive(Debug, Clone)]
pub struct TemplateProcessor {
    catalog: TemplateCatalog,
}

impl TemplateProcessor {
    /// Create a processor over a fixed catalog.
    #[must_use]
    pub fn new(catalog: TemplateCatalog) -> Self {
        Self { catalog }
    }

    /// The catalog this processor reads from.
    #[must_use]
    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// Resolve the template file for `kind`.
    ///
    /// The kind is validated first; the file system is only consulted for
    /// recognized kinds.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::InvalidTemplateKind`] for an unrecognized kind
    /// and [`TemplateError::TemplateNotFound`] when the file is missing.
    pub fn template_path(&self, kind: &str) -> Result<PathBuf, TemplateError> {
        let entry = self.catalog.entry(kind)?;
        self.existing_path(entry)
    }

    /// Marker set for `kind` built from caller-supplied values.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::InvalidTemplateKind`] for an unrecognized kind.
    pub fn marker_set(
        &self,
        kind: &str,
        values: &HashMap<String, String>,
    ) -> Result<MarkerSet, TemplateError> {
        let entry = self.catalog.entry(kind)?;
        Ok(MarkerSet::new(&entry.marker_names, values))
    }

    /// Substitute markers in the main document part of an open package.
    ///
    /// # Errors
    ///
    /// Fails when the main document part is missing or not well-formed.
    pub fn fill(
        &self,
        package: &mut DocxPackage,
        markers: &MarkerSet,
    ) -> Result<ApplyReport, TemplateError> {
        let mut doc = package.main_document()?;
        let report = apply(&mut doc, markers);
        package.set_main_document(&doc);
        Ok(report)
    }

    /// Fill the template for `kind` and save the result to `output`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::InvalidTemplateKind`] before touching any file
    /// when `kind` is unrecognized, [`TemplateError::TemplateNotFound`] when
    /// the template is missing, and [`TemplateError::Docx`] for read or write
    /// failures.
    pub fn process(
        &self,
        kind: &str,
        values: &HashMap<String, String>,
        output: &Path,
    ) -> Result<ApplyReport, TemplateError> {
        let entry = self.catalog.entry(kind)?;
        let markers = MarkerSet::new(&entry.marker_names, values);
        let path = self.existing_path(entry)?;

        let mut package = DocxPackage::open(&path)?;
        let report = self.fill(&mut package, &markers)?;
        package.save(output)?;

        tracing::info!(
            kind = %entry.kind,
            template = %path.display(),
            output = %output.display(),
            runs_rewritten = report.runs_rewritten,
            "Processed template"
        );
        Ok(report)
    }

    /// Marker names present in the template for `kind`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::template_path`], plus read failures.
    pub fn markers_in(&self, kind: &str) -> Result<Vec<String>, TemplateError> {
        let path = self.template_path(kind)?;
        let package = DocxPackage::open(&path)?;
        let doc = package.main_document()?;
        Ok(scan_markers(&doc))
    }

    fn existing_path(&self, entry: &TemplateEntry) -> Result<PathBuf, TemplateError> {
        let path = self.catalog.path_of(entry);
        if path.is_file() {
            Ok(path)
        } else {
            Err(TemplateError::TemplateNotFound(path))
        }
    }
}
