//! `placard fill` command implementation.

use std::path::PathBuf;

use clap::Args;

use super::common::{CommonArgs, ValueArgs, processor_from_config};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the fill command.
#[derive(Args)]
pub(crate) struct FillArgs {
    /// Template kind (a4 or 4x1).
    #[arg(short, long)]
    kind: String,

    /// Where to write the filled document.
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    values: ValueArgs,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl FillArgs {
    /// Execute the fill command.
    ///
    /// # Errors
    ///
    /// Returns an error if the kind is unknown, the template is missing or
    /// the output cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.common.load_config(None)?;
        let processor = processor_from_config(&config);
        let values = self.values.values()?;

        output.highlight(&format!("Filling {} template...", self.kind));
        let report = processor.process(&self.kind, &values, &self.output)?;

        output.info(&format!(
            "{} paragraphs, {} text boxes, {} runs rewritten",
            report.paragraphs, report.containers, report.runs_rewritten
        ));
        output.success(&format!("Wrote {}", self.output.display()));
        Ok(())
    }
}
