//! Configuration management for placard.
//!
//! Parses `placard.toml` with serde and discovers the file in the current
//! directory or any parent. CLI settings are applied during load via
//! [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String values support `${VAR}` (error if unset) and `${VAR:-default}`.
//!
//! Expanded fields:
//! - `templates.dir`, `templates.a4`, `templates.4x1`
//! - `output.dir`
//! - `renderer.command`

mod expand;

use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use placard_template::{DEFAULT_MARKER_NAMES, TemplateKind};
use regex::Regex;
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "placard.toml";

static MARKER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("invalid marker name regex"));

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override template directory.
    pub templates_dir: Option<PathBuf>,
    /// Override output directory for generated files.
    pub output_dir: Option<PathBuf>,
    /// Override office renderer command.
    pub renderer_command: Option<String>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Template files (paths are relative strings from TOML).
    templates: TemplatesConfigRaw,
    /// Recognized marker names.
    pub markers: MarkersConfig,
    /// Output location and retention (paths are relative strings from TOML).
    output: OutputConfigRaw,
    /// Office renderer.
    pub renderer: RendererConfig,

    /// Resolved template configuration (set after loading).
    #[serde(skip)]
    pub templates_resolved: TemplatesConfig,
    /// Resolved output configuration (set after loading).
    #[serde(skip)]
    pub output_resolved: OutputConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw `[templates]` section.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct TemplatesConfigRaw {
    dir: Option<String>,
    a4: Option<String>,
    #[serde(rename = "4x1")]
    four_by_one: Option<String>,
}

/// Resolved template locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatesConfig {
    /// Directory holding the template files.
    pub dir: PathBuf,
    /// File name of the A4 template.
    pub a4: String,
    /// File name of the 4x1 template.
    pub four_by_one: String,
}

impl TemplatesConfig {
    fn with_dir(dir: PathBuf) -> Self {
        Self {
            dir,
            a4: TemplateKind::A4.default_file_name().to_owned(),
            four_by_one: TemplateKind::FourByOne.default_file_name().to_owned(),
        }
    }
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self::with_dir(PathBuf::from("templates"))
    }
}

/// `[markers]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MarkersConfig {
    /// Marker names recognized in every template, e.g. `fecha_evento`.
    pub names: Vec<String>,
}

impl Default for MarkersConfig {
    fn default() -> Self {
        Self {
            names: DEFAULT_MARKER_NAMES.iter().map(|&name| name.to_owned()).collect(),
        }
    }
}

/// Raw `[output]` section.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    dir: Option<String>,
    retention_hours: Option<u64>,
}

/// Resolved output configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Directory for generated `.docx` and `.pdf` files.
    pub dir: PathBuf,
    /// Age after which generated files are swept.
    pub retention_hours: u64,
}

impl OutputConfig {
    /// Retention period as a [`Duration`].
    #[must_use]
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_hours.saturating_mul(3600))
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("temp_files"),
            retention_hours: 24,
        }
    }
}

/// `[renderer]` section.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct RendererConfig {
    /// Office suite executable. Auto-detected when unset.
    pub command: Option<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`output.dir`").
        field: String,
        /// Error message (e.g., "${`TEMP_STORAGE_PATH`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise, searches
    /// for `placard.toml` in the current directory and parents, falling back
    /// to defaults relative to the current directory.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(dir) = &settings.templates_dir {
            self.templates_resolved.dir.clone_from(dir);
        }
        if let Some(dir) = &settings.output_dir {
            self.output_resolved.dir.clone_from(dir);
        }
        if let Some(command) = &settings.renderer_command {
            self.renderer.command = Some(command.clone());
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            templates: TemplatesConfigRaw::default(),
            markers: MarkersConfig::default(),
            output: OutputConfigRaw::default(),
            renderer: RendererConfig::default(),
            templates_resolved: TemplatesConfig::with_dir(base.join("templates")),
            output_resolved: OutputConfig {
                dir: base.join("temp_files"),
                ..OutputConfig::default()
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_templates()?;
        self.validate_markers()?;

        if self.output_resolved.retention_hours == 0 {
            return Err(ConfigError::Validation(
                "output.retention_hours must be greater than 0".to_owned(),
            ));
        }
        if let Some(command) = &self.renderer.command {
            require_non_empty(command, "renderer.command")?;
        }
        Ok(())
    }

    fn validate_templates(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.templates_resolved.a4, "templates.a4")?;
        require_non_empty(&self.templates_resolved.four_by_one, "templates.4x1")?;
        Ok(())
    }

    fn validate_markers(&self) -> Result<(), ConfigError> {
        if self.markers.names.is_empty() {
            return Err(ConfigError::Validation(
                "markers.names cannot be empty".to_owned(),
            ));
        }
        if let Some(name) = self
            .markers
            .names
            .iter()
            .find(|name| !MARKER_NAME.is_match(name))
        {
            return Err(ConfigError::Validation(format!(
                "markers.names: invalid marker name {name:?} (letters, digits and _ only)"
            )));
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        let templates = &mut self.templates;
        if let Some(ref dir) = templates.dir {
            templates.dir = Some(expand::expand_env(dir, "templates.dir")?);
        }
        if let Some(ref a4) = templates.a4 {
            templates.a4 = Some(expand::expand_env(a4, "templates.a4")?);
        }
        if let Some(ref file) = templates.four_by_one {
            templates.four_by_one = Some(expand::expand_env(file, "templates.4x1")?);
        }

        if let Some(ref dir) = self.output.dir {
            self.output.dir = Some(expand::expand_env(dir, "output.dir")?);
        }

        if let Some(ref command) = self.renderer.command {
            self.renderer.command = Some(expand::expand_env(command, "renderer.command")?);
        }

        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));
        let defaults = TemplatesConfig::default();

        self.templates_resolved = TemplatesConfig {
            dir: resolve(self.templates.dir.as_deref(), "templates"),
            a4: self.templates.a4.clone().unwrap_or(defaults.a4),
            four_by_one: self
                .templates
                .four_by_one
                .clone()
                .unwrap_or(defaults.four_by_one),
        };

        let output_defaults = OutputConfig::default();
        self.output_resolved = OutputConfig {
            dir: resolve(self.output.dir.as_deref(), "temp_files"),
            retention_hours: self
                .output
                .retention_hours
                .unwrap_or(output_defaults.retention_hours),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/srv"));
        assert_eq!(
            config.templates_resolved.dir,
            PathBuf::from("/srv/templates")
        );
        assert_eq!(config.templates_resolved.a4, "Formato a4.docx");
        assert_eq!(config.templates_resolved.four_by_one, "Formato 4x1.docx");
        assert_eq!(config.output_resolved.dir, PathBuf::from("/srv/temp_files"));
        assert_eq!(config.output_resolved.retention_hours, 24);
        assert_eq!(config.markers.names.len(), 4);
        assert!(config.renderer.command.is_none());
    }

    #[test]
    fn test_defaults_follow_template_catalog() {
        let config = Config::default_with_base(Path::new("/srv"));
        assert_eq!(config.markers.names, DEFAULT_MARKER_NAMES);
        assert_eq!(
            config.templates_resolved.a4,
            TemplateKind::A4.default_file_name()
        );
        assert_eq!(
            config.templates_resolved.four_by_one,
            TemplateKind::FourByOne.default_file_name()
        );
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.markers.names[0], "fecha_evento");
        assert!(config.templates.dir.is_none());
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[templates]
dir = "assets/templates"
"4x1" = "Banner.docx"

[output]
dir = "/var/tmp/placard"
retention_hours = 6
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.templates_resolved,
            TemplatesConfig {
                dir: PathBuf::from("/project/assets/templates"),
                a4: "Formato a4.docx".to_owned(),
                four_by_one: "Banner.docx".to_owned(),
            }
        );
        // Absolute paths are kept as-is
        assert_eq!(config.output_resolved.dir, PathBuf::from("/var/tmp/placard"));
        assert_eq!(
            config.output_resolved.retention(),
            Duration::from_secs(6 * 3600)
        );
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/srv"));
        let overrides = CliSettings {
            output_dir: Some(PathBuf::from("/tmp/out")),
            renderer_command: Some("libreoffice".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.output_resolved.dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.renderer.command.as_deref(), Some("libreoffice"));
        // Unchanged
        assert_eq!(
            config.templates_resolved.dir,
            PathBuf::from("/srv/templates")
        );
    }

    #[test]
    fn test_validate_marker_names() {
        let toml = r#"
[markers]
names = ["fecha_evento", "hora evento"]
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("hora evento"));
    }

    #[test]
    fn test_validate_empty_markers() {
        let mut config: Config = toml::from_str("[markers]\nnames = []").unwrap();
        config.resolve_paths(Path::new("/project"));

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("markers.names"));
    }

    #[test]
    fn test_validate_retention() {
        let mut config: Config = toml::from_str("[output]\nretention_hours = 0").unwrap();
        config.resolve_paths(Path::new("/project"));

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("retention_hours"));
    }

    #[test]
    fn test_validate_empty_template_name() {
        let mut config: Config = toml::from_str("[templates]\na4 = \"\"").unwrap();
        config.resolve_paths(Path::new("/project"));

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("templates.a4"));
    }

    #[test]
    fn test_expand_env_vars_output_dir() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("PLACARD_TEST_STORAGE", "/data/generated");
        }

        let toml = r#"
[output]
dir = "${PLACARD_TEST_STORAGE:-temp_files}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.output.dir.as_deref(), Some("/data/generated"));

        unsafe {
            std::env::remove_var("PLACARD_TEST_STORAGE");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("PLACARD_MISSING_OFFICE");
        }

        let toml = r#"
[renderer]
command = "${PLACARD_MISSING_OFFICE}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("renderer.command"));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            r#"
[templates]
dir = "tpl"

[markers]
names = ["fecha_evento", "lugar_evento"]
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.templates_resolved.dir, dir.path().join("tpl"));
        assert_eq!(config.markers.names, vec!["fecha_evento", "lugar_evento"]);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/placard.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[output\nretention_hours = ").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
