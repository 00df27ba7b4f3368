//! Fixed-layout rendering, batch generation and retention for placard.
//!
//! [`Generator`] fills every template of a catalog and hands the result to a
//! [`Renderer`]; [`OfficeRenderer`] drives a headless office suite.
//! [`sweep_older_than`] deletes generated files past their retention period.

mod generator;
mod renderer;
mod retention;

pub use generator::{
    GenerateError, GeneratedDocument, GenerationStatus, Generator, sanitize_project_name,
};
pub use renderer::{OfficeRenderer, RenderError, Renderer};
pub use retention::{SweepReport, sweep_older_than};
