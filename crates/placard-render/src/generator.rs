//! Batch generation: one filled `.docx` and one PDF per template kind.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use placard_template::{TemplateError, TemplateKind, TemplateProcessor};
use serde::Serialize;

use crate::renderer::{RenderError, Renderer};

/// Outcome of generating one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    /// The PDF was written.
    Success,
    /// Filling or rendering failed; see the message.
    Error,
}

/// Result entry for one template kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedDocument {
    /// Template kind identifier (`a4`, `4x1`).
    #[serde(rename = "type")]
    pub kind: String,
    /// PDF file name inside the output directory; empty on error.
    pub filename: String,
    /// Whether generation succeeded.
    pub status: GenerationStatus,
    /// Error description when generation failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl GeneratedDocument {
    fn success(kind: TemplateKind, filename: String) -> Self {
        Self {
            kind: kind.to_string(),
            filename,
            status: GenerationStatus::Success,
            message: None,
        }
    }

    fn failure(kind: TemplateKind, error: &GenerateError) -> Self {
        Self {
            kind: kind.to_string(),
            filename: String::new(),
            status: GenerationStatus::Error,
            message: Some(error.to_string()),
        }
    }

    /// Whether the document was generated.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == GenerationStatus::Success
    }
}

/// Error generating a single document.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GenerateError {
    /// Filling the template failed.
    #[error("{0}")]
    Template(#[from] TemplateError),

    /// Rendering the filled document failed.
    #[error("{0}")]
    Render(#[from] RenderError),

    /// Preparing the output directory failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fills every catalog template and renders it to PDF.
pub struct Generator {
    processor: TemplateProcessor,
    renderer: Box<dyn Renderer>,
    output_dir: PathBuf,
}

impl Generator {
    /// Create a generator writing into `output_dir`.
    #[must_use]
    pub fn new(
        processor: TemplateProcessor,
        renderer: Box<dyn Renderer>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            processor,
            renderer,
            output_dir: output_dir.into(),
        }
    }

    /// Output directory for generated files.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Generate one PDF per template kind, in catalog order.
    ///
    /// Files are named `<project>_<kind>.docx` / `<project>_<kind>.pdf`. A
    /// failing kind is reported in its entry and does not stop the others.
    pub fn generate_all(
        &self,
        values: &HashMap<String, String>,
        project_name: &str,
    ) -> Vec<GeneratedDocument> {
        let project = sanitize_project_name(project_name);

        self.processor
            .catalog()
            .entries()
            .iter()
            .map(|entry| match self.generate(entry.kind, values, &project) {
                Ok(filename) => {
                    tracing::info!(kind = %entry.kind, file = %filename, "Generated document");
                    GeneratedDocument::success(entry.kind, filename)
                }
                Err(err) => {
                    tracing::warn!(kind = %entry.kind, error = %err, "Document generation failed");
                    GeneratedDocument::failure(entry.kind, &err)
                }
            })
            .collect()
    }

    /// Fill and render a single kind, returning the PDF file name.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] when filling, rendering or creating the
    /// output directory fails.
    pub fn generate(
        &self,
        kind: TemplateKind,
        values: &HashMap<String, String>,
        project: &str,
    ) -> Result<String, GenerateError> {
        std::fs::create_dir_all(&self.output_dir)?;

        let stem = format!("{project}_{kind}");
        let docx_path = self.output_dir.join(format!("{stem}.docx"));
        let pdf_name = format!("{stem}.pdf");
        let pdf_path = self.output_dir.join(&pdf_name);

        self.processor.process(kind.as_str(), values, &docx_path)?;
        self.renderer.render(&docx_path, &pdf_path)?;

        Ok(pdf_name)
    }
}

/// Restrict a project name to `[A-Za-z0-9_-]` so it is safe in file names.
///
/// Other characters become `_`; an empty result falls back to `document`.
#[must_use]
pub fn sanitize_project_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.is_empty() {
        "document".to_owned()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use placard_docx::{DocxPackage, MAIN_DOCUMENT_PART};
    use placard_template::TemplateCatalog;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    /// Renderer that copies the filled document in place of a PDF.
    struct CopyRenderer;

    impl Renderer for CopyRenderer {
        fn render(&self, input: &Path, output: &Path) -> Result<(), RenderError> {
            std::fs::copy(input, output)?;
            Ok(())
        }
    }

    fn write_template(dir: &Path, name: &str) {
        let xml = concat!(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#,
            r#"<w:p><w:r><w:t>{{lugar_evento}}</w:t></w:r></w:p>"#,
            r#"</w:body></w:document>"#,
        );
        let mut package = DocxPackage::new();
        package.set_part(MAIN_DOCUMENT_PART, xml.as_bytes().to_vec());
        package.save(&dir.join(name)).unwrap();
    }

    fn values() -> HashMap<String, String> {
        HashMap::from([("lugar_evento".to_owned(), "Central Hall".to_owned())])
    }

    #[test]
    fn test_generate_all_kinds() {
        let templates = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_template(templates.path(), "Formato a4.docx");
        write_template(templates.path(), "Formato 4x1.docx");
        let generator = Generator::new(
            TemplateProcessor::new(TemplateCatalog::with_defaults(templates.path().into())),
            Box::new(CopyRenderer),
            output.path().join("generated"),
        );

        let results = generator.generate_all(&values(), "Spring Gala");

        assert_eq!(
            results,
            vec![
                GeneratedDocument::success(TemplateKind::A4, "Spring_Gala_a4.pdf".to_owned()),
                GeneratedDocument::success(
                    TemplateKind::FourByOne,
                    "Spring_Gala_4x1.pdf".to_owned()
                ),
            ]
        );
        let pdf = output.path().join("generated/Spring_Gala_4x1.pdf");
        let doc = DocxPackage::open(&pdf).unwrap().main_document().unwrap();
        assert_eq!(placard_template::scan_markers(&doc), Vec::<String>::new());
    }

    #[test]
    fn test_failure_does_not_stop_other_kinds() {
        let templates = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_template(templates.path(), "Formato 4x1.docx");
        let generator = Generator::new(
            TemplateProcessor::new(TemplateCatalog::with_defaults(templates.path().into())),
            Box::new(CopyRenderer),
            output.path(),
        );

        let results = generator.generate_all(&values(), "gala");

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].status, GenerationStatus::Error);
        assert!(results[0].filename.is_empty());
        assert!(
            results[0]
                .message
                .as_deref()
                .unwrap()
                .contains("Formato a4.docx")
        );
        assert!(results[1].is_success());
        assert!(output.path().join("gala_4x1.pdf").is_file());
    }

    #[test]
    fn test_render_error_is_reported() {
        struct FailingRenderer;
        impl Renderer for FailingRenderer {
            fn render(&self, _input: &Path, _output: &Path) -> Result<(), RenderError> {
                Err(RenderError::Failed {
                    status: "exit status: 1".to_owned(),
                    stderr: "source file could not be loaded".to_owned(),
                })
            }
        }

        let templates = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_template(templates.path(), "Formato a4.docx");
        write_template(templates.path(), "Formato 4x1.docx");
        let generator = Generator::new(
            TemplateProcessor::new(TemplateCatalog::with_defaults(templates.path().into())),
            Box::new(FailingRenderer),
            output.path(),
        );

        let results = generator.generate_all(&values(), "gala");

        assert!(results.iter().all(|doc| !doc.is_success()));
        // The filled document is kept even when rendering fails
        assert!(output.path().join("gala_a4.docx").is_file());
    }

    #[test]
    fn test_serialize_results() {
        let results = vec![
            GeneratedDocument::success(TemplateKind::A4, "gala_a4.pdf".to_owned()),
            GeneratedDocument {
                kind: "4x1".to_owned(),
                filename: String::new(),
                status: GenerationStatus::Error,
                message: Some("template not found".to_owned()),
            },
        ];

        let json = serde_json::to_value(&results).unwrap();

        assert_eq!(
            json,
            serde_json::json!([
                {"type": "a4", "filename": "gala_a4.pdf", "status": "success"},
                {"type": "4x1", "filename": "", "status": "error", "message": "template not found"},
            ])
        );
    }

    #[test]
    fn test_sanitize_project_name() {
        assert_eq!(sanitize_project_name("Spring Gala"), "Spring_Gala");
        assert_eq!(sanitize_project_name("../etc/passwd"), "___etc_passwd");
        assert_eq!(sanitize_project_name("feria-2026_v2"), "feria-2026_v2");
        assert_eq!(sanitize_project_name("  "), "document");
        assert_eq!(sanitize_project_name("Año"), "A_o");
    }
}
