//! `placard generate` command implementation.

use clap::Args;
use placard_render::{Generator, OfficeRenderer};

use super::common::{CommonArgs, ValueArgs, processor_from_config};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the generate command.
#[derive(Args)]
pub(crate) struct GenerateArgs {
    /// Project name used as the output file prefix.
    #[arg(short, long)]
    project: String,

    #[command(flatten)]
    values: ValueArgs,

    /// Office suite executable (overrides config).
    #[arg(long)]
    renderer: Option<String>,

    /// Print results as JSON on stdout.
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl GenerateArgs {
    /// Execute the generate command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or any document could not be
    /// generated.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.common.load_config(self.renderer.clone())?;
        let values = self.values.values()?;

        let renderer = OfficeRenderer::detect(config.renderer.command.as_deref());
        tracing::info!(command = renderer.command(), "Using office renderer");
        let generator = Generator::new(
            processor_from_config(&config),
            Box::new(renderer),
            config.output_resolved.dir.clone(),
        );

        let results = generator.generate_all(&values, &self.project);

        if self.json {
            output.data(&serde_json::to_string_pretty(&results)?);
        } else {
            for doc in &results {
                let detail = if doc.is_success() {
                    generator.output_dir().join(&doc.filename).display().to_string()
                } else {
                    doc.message.clone().unwrap_or_else(|| "failed".to_owned())
                };
                output.document(&doc.kind, doc.is_success(), &detail);
            }
        }

        let failed = results.iter().filter(|doc| !doc.is_success()).count();
        if failed > 0 {
            return Err(CliError::Validation(format!(
                "{failed} of {} documents failed",
                results.len()
            )));
        }
        Ok(())
    }
}
