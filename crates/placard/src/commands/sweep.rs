//! `placard sweep` command implementation.

use std::time::Duration;

use clap::Args;
use placard_render::sweep_older_than;

use super::common::CommonArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the sweep command.
#[derive(Args)]
pub(crate) struct SweepArgs {
    /// Retention in hours (overrides config).
    #[arg(long)]
    hours: Option<u64>,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl SweepArgs {
    /// Execute the sweep command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or `--hours` is 0.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.common.load_config(None)?;

        let max_age = match self.hours {
            Some(0) => {
                return Err(CliError::Validation(
                    "--hours must be greater than 0".to_owned(),
                ));
            }
            Some(hours) => Duration::from_secs(hours.saturating_mul(3600)),
            None => config.output_resolved.retention(),
        };

        let dir = &config.output_resolved.dir;
        let report = sweep_older_than(dir, max_age);

        output.info(&format!(
            "{}: removed {}, kept {}",
            dir.display(),
            report.removed,
            report.kept
        ));
        if report.failed > 0 {
            output.warning(&format!("{} files could not be removed", report.failed));
        }
        Ok(())
    }
}
