//! Placeholder substitution over Word templates.
//!
//! Word splits typed text into runs at arbitrary points (spell checking,
//! formatting changes, revision tracking), so a marker like
//! `{{fecha_evento}}` may be stored as `{{fec` + `ha_evento}}`. This crate
//! rebuilds such markers and replaces them in place.
//!
//! - [`merge_runs`]: the run-fragment merger, written against [`MutableTextRun`]
//! - [`extract_containers`]: text boxes as [`ContainerRun`] sequences
//! - [`apply`]: main flow, tables and text boxes of a whole [`Document`]
//! - [`TemplateProcessor`]: template lookup by [`TemplateKind`] and file output
//!
//! # Example
//!
//! ```
//! use placard_docx::XmlParser;
//! use placard_template::{MarkerSet, apply};
//!
//! let mut doc = XmlParser::new().parse(concat!(
//!     r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
//!     r#"<w:body><w:p><w:r><w:t>{{fec</w:t></w:r><w:r><w:t>ha_evento}}</w:t></w:r></w:p></w:body>"#,
//!     r#"</w:document>"#,
//! ))?;
//!
//! let report = apply(&mut doc, &MarkerSet::from_pairs([("fecha_evento", "12 May")]));
//! assert_eq!(report.runs_rewritten, 2);
//! # Ok::<(), placard_docx::DocxError>(())
//! ```
//!
//! [`Document`]: placard_docx::Document

mod driver;
mod error;
mod extract;
mod kind;
mod marker;
mod merger;
mod processor;
mod run;
mod scan;
mod walk;

pub use driver::{ApplyReport, apply};
pub use error::TemplateError;
pub use extract::{Container, extract_containers};
pub use kind::{DEFAULT_MARKER_NAMES, TemplateCatalog, TemplateEntry, TemplateKind};
pub use marker::{Marker, MarkerSet};
pub use merger::merge_runs;
pub use processor::TemplateProcessor;
pub use run::{ContainerRun, FlowRun, MutableTextRun};
pub use scan::scan_markers;
