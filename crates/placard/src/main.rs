//! placard CLI - Event flyer generation from Word templates.
//!
//! Provides commands for:
//! - `fill`: Fill one template and write the `.docx`
//! - `generate`: Fill and render every template to PDF
//! - `markers`: List the markers a template contains
//! - `sweep`: Delete expired generated files

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{FillArgs, GenerateArgs, MarkersArgs, SweepArgs};
use output::Output;

/// placard - Event flyer generation from Word templates.
#[derive(Parser)]
#[command(name = "placard", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill one template with marker values.
    Fill(FillArgs),
    /// Fill every template and render it to PDF.
    Generate(GenerateArgs),
    /// List marker names found in a template.
    Markers(MarkersArgs),
    /// Delete generated files older than the retention period.
    Sweep(SweepArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        let common = match self {
            Self::Fill(args) => &args.common,
            Self::Generate(args) => &args.common,
            Self::Markers(args) => &args.common,
            Self::Sweep(args) => &args.common,
        };
        common.verbose
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Fill(args) => args.execute(),
        Commands::Generate(args) => args.execute(),
        Commands::Markers(args) => args.execute(),
        Commands::Sweep(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
