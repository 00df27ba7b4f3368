//! Conversion of filled documents to PDF.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Usual office suite install locations, checked in order.
const OFFICE_CANDIDATES: &[&str] = &[
    "/usr/bin/soffice",
    "/usr/lib/libreoffice/program/soffice",
    "/opt/libreoffice/program/soffice",
    "/Applications/LibreOffice.app/Contents/MacOS/soffice",
    r"C:\Program Files\LibreOffice\program\soffice.exe",
    r"C:\Program Files (x86)\LibreOffice\program\soffice.exe",
];

/// Command used when nothing else is found; resolved through `PATH`.
const OFFICE_FALLBACK: &str = "soffice";

/// Error from a renderer.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RenderError {
    /// The renderer executable could not be started.
    #[error("renderer command not found: {0}")]
    CommandNotFound(String),

    /// The renderer ran but reported failure.
    #[error("renderer exited with {status}: {stderr}")]
    Failed {
        /// Exit status as reported by the OS.
        status: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// The renderer succeeded but the expected file is absent.
    #[error("renderer produced no output at {}", .0.display())]
    MissingOutput(PathBuf),

    /// I/O error around the conversion.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Converts a `.docx` file into a fixed-layout page file.
pub trait Renderer: Send + Sync {
    /// Render `input` into `output`, replacing any existing file.
    fn render(&self, input: &Path, output: &Path) -> Result<(), RenderError>;
}

/// Headless office suite renderer (`soffice --headless --convert-to pdf`).
#[derive(Debug, Clone)]
pub struct OfficeRenderer {
    command: String,
}

impl OfficeRenderer {
    /// Create a renderer running `command`.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Use `configured` when set, otherwise the first existing install
    /// location, otherwise `soffice` from `PATH`.
    #[must_use]
    pub fn detect(configured: Option<&str>) -> Self {
        let candidates: Vec<&Path> = OFFICE_CANDIDATES.iter().map(Path::new).collect();
        Self::new(detect_command(configured, &candidates))
    }

    /// Command this renderer runs.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }
}

impl Renderer for OfficeRenderer {
    fn render(&self, input: &Path, output: &Path) -> Result<(), RenderError> {
        let outdir = output
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        tracing::debug!(
            command = %self.command,
            input = %input.display(),
            outdir = %outdir.display(),
            "Running office renderer"
        );
        let result = Command::new(&self.command)
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(outdir)
            .arg(input)
            .output();

        let result = match result {
            Ok(result) => result,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(RenderError::CommandNotFound(self.command.clone()));
            }
            Err(err) => return Err(err.into()),
        };

        if !result.status.success() {
            return Err(RenderError::Failed {
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_owned(),
            });
        }

        // The suite names its output after the input file
        let mut produced = outdir.join(input.file_name().unwrap_or_default());
        produced.set_extension("pdf");
        if produced != output && produced.is_file() {
            if output.exists() {
                std::fs::remove_file(output)?;
            }
            std::fs::rename(&produced, output)?;
        }

        if !output.is_file() {
            return Err(RenderError::MissingOutput(output.to_path_buf()));
        }
        Ok(())
    }
}

fn detect_command(configured: Option<&str>, candidates: &[&Path]) -> String {
    if let Some(command) = configured {
        return command.to_owned();
    }
    candidates
        .iter()
        .find(|path| path.is_file())
        .map_or_else(
            || OFFICE_FALLBACK.to_owned(),
            |path| path.to_string_lossy().into_owned(),
        )
}
