// UAProbe - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "UAProbe";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "UAProbe";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Platform tables
// =============================================================================

/// ID of the table used when neither the CLI nor config.toml names one.
pub const DEFAULT_TABLE_ID: &str = "enyo-default";

/// Maximum length of a single rule pattern. Long patterns are rejected at
/// compile time to keep user tables from introducing pathological regexes.
pub const MAX_REGEX_PATTERN_LENGTH: usize = 1_024;

/// Maximum number of rules in a single table.
pub const MAX_RULES_PER_TABLE: usize = 256;

/// Maximum number of tables held at once (builtin + user).
pub const MAX_TABLES: usize = 64;

/// Maximum size of a table file on disk.
pub const MAX_TABLE_FILE_SIZE: u64 = 256 * 1024; // 256 KB

/// Directory name (under the config root) holding user-defined tables.
pub const TABLES_DIR_NAME: &str = "tables";

/// Platforms whose console only accepts a single argument per call.
pub const SINGLE_ARG_CONSOLE_PLATFORMS: &[&str] = &["android", "ios", "webos"];

// =============================================================================
// Batch probing
// =============================================================================

/// Maximum user-agent strings accepted in one batch.
pub const MAX_BATCH_SIZE: usize = 100_000;

/// Maximum length of a single user-agent string. Longer input is truncated
/// (on a char boundary) before matching.
pub const MAX_USER_AGENT_LENGTH: usize = 4_096;

/// Maximum bytes read from an input file or stdin. Input past this point is
/// ignored with a warning.
pub const MAX_INPUT_SIZE: u64 = 64 * 1024 * 1024; // 64 MB

/// Lines starting with this prefix in an input file are ignored.
pub const INPUT_COMMENT_PREFIX: &str = "#";

// =============================================================================
// Repeater
// =============================================================================

/// Upper bound on the number of items a repeater will build.
pub const MAX_REPEATER_ITEMS: usize = 1_000_000;

/// Property a component renders as its visible text.
pub const TEXT_PROPERTY: &str = "text";

/// Default separator between rendered columns of a repeater row.
pub const DEFAULT_COLUMN_SEPARATOR: &str = "  ";

/// Maximum length of a configured column separator.
pub const MAX_COLUMN_SEPARATOR_LENGTH: usize = 16;

// =============================================================================
// Configuration and logging
// =============================================================================

/// Config file name (in the config root).
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Maximum size of config.toml.
pub const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024; // 64 KB

/// Default tracing filter. The report goes to stdout, so logging stays quiet
/// unless asked.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Accepted values for `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];
