//! `placard markers` command implementation.

use clap::Args;

use super::common::{CommonArgs, processor_from_config};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the markers command.
#[derive(Args)]
pub(crate) struct MarkersArgs {
    /// Template kind (a4 or 4x1).
    #[arg(short, long)]
    kind: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl MarkersArgs {
    /// Execute the markers command.
    ///
    /// # Errors
    ///
    /// Returns an error if the kind is unknown or the template cannot be read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.common.load_config(None)?;
        let processor = processor_from_config(&config);

        let names = processor.markers_in(&self.kind)?;
        if names.is_empty() {
            output.warning(&format!("No markers found in {} template", self.kind));
            return Ok(());
        }

        for name in &names {
            if config.markers.names.contains(name) {
                output.data(name);
            } else {
                output.data(&format!("{name} (not configured)"));
            }
        }
        Ok(())
    }
}
