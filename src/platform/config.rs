// UAProbe - platform/config.rs
//
// Platform-specific directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for UAProbe configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/uaprobe/ or %APPDATA%\UAProbe\config\)
    pub config_dir: PathBuf,

    /// User table directory (e.g. ~/.config/uaprobe/tables/)
    pub user_tables_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to the current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let user_tables_dir = config_dir.join(constants::TABLES_DIR_NAME);

            tracing::debug!(
                config = %config_dir.display(),
                tables = %user_tables_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                user_tables_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                user_tables_dir: fallback.join(constants::TABLES_DIR_NAME),
                config_dir: fallback,
            }
        }
    }
}

// =============================================================================
// Output format
// =============================================================================

/// How probe results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned text rows, one per input string.
    #[default]
    Text,
    /// Pretty-printed JSON array.
    Json,
    /// CSV with a header row.
    Csv,
}

impl OutputFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[detection]` section.
    pub detection: DetectionSection,
    /// `[output]` section.
    pub output: OutputSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[detection]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DetectionSection {
    /// ID of the platform table to use.
    pub table: Option<String>,
    /// Additional directory of user-defined tables.
    pub user_table_directory: Option<String>,
}

/// `[output]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// "text", "json" or "csv".
    pub format: Option<String>,
    /// Column separator for text output.
    pub separator: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Table used for detection.
    pub table_id: String,
    /// User table directory override.
    pub user_table_dir: Option<PathBuf>,
    /// Output format.
    pub output_format: OutputFormat,
    /// Column separator for text output.
    pub separator: String,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            table_id: constants::DEFAULT_TABLE_ID.to_string(),
            user_table_dir: None,
            output_format: OutputFormat::default(),
            separator: constants::DEFAULT_COLUMN_SEPARATOR.to_string(),
            log_level: None,
        }
    }
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first run).
/// If the file is unreadable or unparseable, returns defaults and a warning
/// so the tool still runs but the user is told.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    match super::fs::read_file_capped(&config_path, constants::MAX_CONFIG_FILE_SIZE) {
        Ok(content) => parse_config(&content, &config_path),
        Err(e) => {
            let err = ConfigError::Io {
                path: config_path,
                source: e,
            };
            (AppConfig::default(), vec![format!("{err}. Using defaults.")])
        }
    }
}

/// Parse and validate config.toml content. `config_path` is for messages only.
pub fn parse_config(content: &str, config_path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    let raw: RawConfig = match toml::from_str(content) {
        Ok(r) => r,
        Err(e) => {
            let err = ConfigError::TomlParse {
                path: config_path.to_path_buf(),
                source: e,
            };
            warnings.push(format!("{err}. Using defaults."));
            return (AppConfig::default(), warnings);
        }
    };

    tracing::debug!(path = %config_path.display(), "Loaded config.toml");

    let mut config = AppConfig::default();

    // -- Detection: table --
    if let Some(ref table) = raw.detection.table {
        let table = table.trim();
        if table.is_empty() {
            warnings.push(format!(
                "[detection] table is empty. Using default ({}).",
                constants::DEFAULT_TABLE_ID
            ));
        } else {
            config.table_id = table.to_string();
        }
    }

    // -- Detection: user_table_directory --
    if let Some(ref dir) = raw.detection.user_table_directory {
        if !dir.is_empty() {
            config.user_table_dir = Some(PathBuf::from(dir));
        }
    }

    // -- Output: format --
    if let Some(ref format) = raw.output.format {
        match OutputFormat::parse(format) {
            Some(f) => config.output_format = f,
            None => warnings.push(format!(
                "[output] format = \"{format}\" is not recognised. \
                 Expected \"text\", \"json\" or \"csv\". Using default (text).",
            )),
        }
    }

    // -- Output: separator --
    if let Some(ref separator) = raw.output.separator {
        let len = separator.chars().count();
        if (1..=constants::MAX_COLUMN_SEPARATOR_LENGTH).contains(&len) {
            config.separator = separator.clone();
        } else {
            let err = ConfigError::ValueOutOfRange {
                field: "output.separator".to_string(),
                value: separator.clone(),
                expected: format!(
                    "1-{} characters",
                    constants::MAX_COLUMN_SEPARATOR_LENGTH
                ),
            };
            warnings.push(format!("{err}. Using default."));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: {}. Using default ({}).",
                constants::VALID_LOG_LEVELS.join(", "),
                constants::DEFAULT_LOG_LEVEL,
            ));
        }
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> (AppConfig, Vec<String>) {
        parse_config(content, Path::new("config.toml"))
    }

    #[test]
    fn test_empty_config_is_default() {
        let (config, warnings) = parse("");
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_valid_config() {
        let (config, warnings) = parse(
            r#"
[detection]
table = "my-table"
user_table_directory = "/opt/tables"

[output]
format = "CSV"
separator = " | "

[logging]
level = "Debug"
"#,
        );
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.table_id, "my-table");
        assert_eq!(config.user_table_dir, Some(PathBuf::from("/opt/tables")));
        assert_eq!(config.output_format, OutputFormat::Csv);
        assert_eq!(config.separator, " | ");
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_invalid_values_fall_back_with_warnings() {
        let (config, warnings) = parse(
            r#"
[detection]
table = "  "

[output]
format = "yaml"
separator = ""

[logging]
level = "loud"
"#,
        );
        assert_eq!(config, AppConfig::default());
        assert_eq!(warnings.len(), 4, "{warnings:?}");
    }

    #[test]
    fn test_unparseable_config_warns() {
        let (config, warnings) = parse("[output\nformat=");
        assert_eq!(config, AppConfig::default());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let (_, warnings) = parse("[future]\nkey = 1\n");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_missing_file_is_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(dir.path());
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_load_config_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(constants::CONFIG_FILE_NAME),
            "[output]\nformat = \"json\"\n",
        )
        .unwrap();
        let (config, warnings) = load_config(dir.path());
        assert!(warnings.is_empty());
        assert_eq!(config.output_format, OutputFormat::Json);
    }
}
