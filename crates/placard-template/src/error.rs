//! Error types for template processing.

use std::path::PathBuf;

use placard_docx::DocxError;

/// Error from the template boundary layer.
///
/// Substitution itself never fails; these cover locating, reading and
/// writing templates.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TemplateError {
    /// The template file for a recognized kind does not exist.
    #[error("template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// The requested template kind is not recognized.
    #[error("invalid template kind: {0}")]
    InvalidTemplateKind(String),

    /// Reading, parsing or writing the package failed.
    #[error("document error: {0}")]
    Docx(#[from] DocxError),
}
