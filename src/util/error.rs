// UAProbe - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors keep their cause so diagnostics can log the full chain.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all UAProbe operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum UaProbeError {
    /// Platform table loading or validation failed.
    Table(TableError),

    /// Repeater was driven with invalid input.
    Repeater(RepeaterError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// Report export failed.
    Export(ExportError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for UaProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table(e) => write!(f, "Table error: {e}"),
            Self::Repeater(e) => write!(f, "Repeater error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for UaProbeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Table(e) => Some(e),
            Self::Repeater(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Table errors
// ---------------------------------------------------------------------------

/// Errors related to platform table loading and validation.
#[derive(Debug)]
pub enum TableError {
    /// TOML file could not be parsed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Table file exceeds the maximum allowed size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// A required field is missing or empty.
    MissingField {
        table_id: String,
        field: &'static str,
    },

    /// The table defines no rules.
    NoRules { table_id: String },

    /// The table defines more rules than allowed.
    TooManyRules {
        table_id: String,
        count: usize,
        max: usize,
    },

    /// A rule pattern is invalid.
    InvalidRegex {
        table_id: String,
        rule: usize,
        pattern: String,
        source: regex::Error,
    },

    /// A rule pattern exceeds the maximum allowed length.
    RegexTooLong {
        table_id: String,
        rule: usize,
        length: usize,
        max_length: usize,
    },

    /// A rule has neither a forced version nor a capture group to read one from.
    NoVersionSource {
        table_id: String,
        rule: usize,
        platform: String,
    },

    /// No loaded table has the requested ID.
    UnknownTable { id: String, available: Vec<String> },

    /// Maximum number of tables exceeded.
    TooManyTables { count: usize, max: usize },

    /// I/O error reading a table file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Failed to parse TOML '{}': {source}", path.display())
            }
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "Table '{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::MissingField { table_id, field } => {
                write!(f, "Table '{table_id}': missing required field '{field}'")
            }
            Self::NoRules { table_id } => write!(f, "Table '{table_id}' defines no rules"),
            Self::TooManyRules {
                table_id,
                count,
                max,
            } => write!(
                f,
                "Table '{table_id}' defines {count} rules, maximum is {max}"
            ),
            Self::InvalidRegex {
                table_id,
                rule,
                pattern,
                source,
            } => write!(
                f,
                "Table '{table_id}': invalid pattern in rule {rule} ('{pattern}'): {source}"
            ),
            Self::RegexTooLong {
                table_id,
                rule,
                length,
                max_length,
            } => write!(
                f,
                "Table '{table_id}': pattern in rule {rule} is {length} chars, \
                 exceeds maximum of {max_length}"
            ),
            Self::NoVersionSource {
                table_id,
                rule,
                platform,
            } => write!(
                f,
                "Table '{table_id}': rule {rule} ('{platform}') has no force_version \
                 and its pattern has no capture group"
            ),
            Self::UnknownTable { id, available } => write!(
                f,
                "No table with ID '{id}'. Available: {}",
                available.join(", ")
            ),
            Self::TooManyTables { count, max } => {
                write!(f, "Too many tables loaded ({count}), maximum is {max}")
            }
            Self::Io { path, source } => {
                write!(f, "I/O error reading table '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::InvalidRegex { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<TableError> for UaProbeError {
    fn from(e: TableError) -> Self {
        Self::Table(e)
    }
}

// ---------------------------------------------------------------------------
// Repeater errors
// ---------------------------------------------------------------------------

/// Errors raised by the list repeater.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepeaterError {
    /// Item count is negative or above the allowed maximum.
    InvalidCount { count: i64, max: usize },

    /// No item exists at the requested index.
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for RepeaterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCount { count, max } => write!(
                f,
                "Invalid item count {count}: expected a non-negative integer no greater than {max}"
            ),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "No item at index {index} (repeater holds {len} items)")
            }
        }
    }
}

impl std::error::Error for RepeaterError {}

impl From<RepeaterError> for UaProbeError {
    fn from(e: RepeaterError) -> Self {
        Self::Repeater(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to report export.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the report.
    Io { target: String, source: io::Error },

    /// CSV serialisation error.
    Csv { target: String, source: csv::Error },

    /// JSON serialisation error.
    Json {
        target: String,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { target, source } => write!(f, "Export I/O error '{target}': {source}"),
            Self::Csv { target, source } => write!(f, "CSV export error '{target}': {source}"),
            Self::Json { target, source } => write!(f, "JSON export error '{target}': {source}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for UaProbeError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for UaProbeError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for UAProbe results.
pub type Result<T> = std::result::Result<T, UaProbeError>;
