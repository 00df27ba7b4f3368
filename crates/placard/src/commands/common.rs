//! Arguments and helpers shared by all commands.

use std::collections::HashMap;
use std::path::PathBuf;

use clap::Args;
use placard_config::{CliSettings, Config};
use placard_template::{TemplateCatalog, TemplateEntry, TemplateKind, TemplateProcessor};

use crate::error::CliError;

/// Options accepted by every command.
#[derive(Args)]
pub(crate) struct CommonArgs {
    /// Path to configuration file (default: auto-discover placard.toml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Template directory (overrides config).
    #[arg(long, env = "PLACARD_TEMPLATES_DIR")]
    pub templates_dir: Option<PathBuf>,

    /// Output directory for generated files (overrides config).
    #[arg(long, env = "TEMP_STORAGE_PATH")]
    pub output_dir: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommonArgs {
    /// Load configuration with CLI overrides applied.
    pub(crate) fn load_config(&self, renderer_command: Option<String>) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            templates_dir: self.templates_dir.clone(),
            output_dir: self.output_dir.clone(),
            renderer_command,
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Marker values from `--data` and `--set`.
#[derive(Args)]
pub(crate) struct ValueArgs {
    /// Marker value as `name=value` (repeatable, wins over --data).
    #[arg(short, long = "set", value_name = "NAME=VALUE")]
    pub set: Vec<String>,

    /// JSON file with an object of marker values.
    #[arg(short, long, value_name = "FILE")]
    pub data: Option<PathBuf>,
}

impl ValueArgs {
    /// Collect marker values; `--set` entries override the data file.
    pub(crate) fn values(&self) -> Result<HashMap<String, String>, CliError> {
        let mut values = match &self.data {
            Some(path) => parse_values_json(&std::fs::read_to_string(path)?)?,
            None => HashMap::new(),
        };
        for pair in &self.set {
            let (name, value) = parse_assignment(pair)?;
            values.insert(name.to_owned(), value.to_owned());
        }
        Ok(values)
    }
}

fn parse_values_json(json: &str) -> Result<HashMap<String, String>, CliError> {
    Ok(serde_json::from_str(json)?)
}

fn parse_assignment(pair: &str) -> Result<(&str, &str), CliError> {
    match pair.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value)),
        _ => Err(CliError::Validation(format!(
            "invalid --set value {pair:?}, expected NAME=VALUE"
        ))),
    }
}

/// Build the template processor described by the configuration.
pub(crate) fn processor_from_config(config: &Config) -> TemplateProcessor {
    let templates = &config.templates_resolved;
    let entries = TemplateKind::ALL
        .into_iter()
        .map(|kind| TemplateEntry {
            kind,
            file_name: match kind {
                TemplateKind::A4 => templates.a4.clone(),
                TemplateKind::FourByOne => templates.four_by_one.clone(),
            },
            marker_names: config.markers.names.clone(),
        })
        .collect();
    TemplateProcessor::new(TemplateCatalog::new(templates.dir.clone(), entries))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("lugar_evento=Central Hall").unwrap(),
            ("lugar_evento", "Central Hall")
        );
        assert_eq!(
            parse_assignment("hora_evento=19:00=late").unwrap(),
            ("hora_evento", "19:00=late")
        );
        assert_eq!(parse_assignment("referencia_evento=").unwrap(), ("referencia_evento", ""));
        assert!(parse_assignment("no_separator").is_err());
        assert!(parse_assignment("=value").is_err());
    }

    #[test]
    fn test_set_overrides_data_file() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("values.json");
        std::fs::write(
            &data,
            r#"{"fecha_evento": "12 May", "lugar_evento": "Old Hall"}"#,
        )
        .unwrap();
        let args = ValueArgs {
            set: vec!["lugar_evento=Central Hall".to_owned()],
            data: Some(data),
        };

        let values = args.values().unwrap();

        assert_eq!(values.len(), 2);
        assert_eq!(values["fecha_evento"], "12 May");
        assert_eq!(values["lugar_evento"], "Central Hall");
    }

    #[test]
    fn test_values_json_must_be_string_map() {
        let err = parse_values_json(r#"{"hora_evento": 19}"#).unwrap_err();
        assert!(matches!(err, CliError::Json(_)));
    }

    #[test]
    fn test_processor_from_config() {
        let config = Config::default();

        let processor = processor_from_config(&config);

        let entry = processor.catalog().entry("4x1").unwrap();
        assert_eq!(entry.file_name, "Formato 4x1.docx");
        assert_eq!(entry.marker_names, config.markers.names);
    }
}
