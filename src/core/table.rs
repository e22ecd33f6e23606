// UAProbe - core/table.rs
//
// Platform table loading and validation.
// Core layer: accepts TOML strings, never touches the filesystem.
// I/O is handled by app::table_mgr which feeds content here.

use crate::core::model::{PlatformRule, PlatformTable};
use crate::util::constants;
use crate::util::error::TableError;
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

// =============================================================================
// TOML deserialization structures (raw input)
// =============================================================================

/// Raw TOML table definition as deserialized from a .toml file.
/// This is validated and compiled into a `PlatformTable` for runtime use.
#[derive(Debug, Deserialize)]
pub struct TableDefinition {
    pub table: TableMeta,
    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleDef>,
}

#[derive(Debug, Deserialize)]
pub struct TableMeta {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct RuleDef {
    pub platform: String,
    pub pattern: String,
    #[serde(default)]
    pub force_version: Option<f64>,
    #[serde(default)]
    pub extra: BTreeMap<String, i64>,
    #[serde(default)]
    pub case_insensitive: bool,
    #[serde(default)]
    pub note: String,
}

// =============================================================================
// Table validation and compilation
// =============================================================================

/// Parse a TOML string into a `TableDefinition`.
///
/// `source_path` is used for error messages only (not for I/O).
pub fn parse_table_toml(
    toml_content: &str,
    source_path: &Path,
) -> Result<TableDefinition, TableError> {
    toml::from_str(toml_content).map_err(|e| TableError::TomlParse {
        path: source_path.to_path_buf(),
        source: e,
    })
}

/// Validate a `TableDefinition` and compile it into a runtime `PlatformTable`.
///
/// Validates:
/// - id and name are non-empty, and there is at least one rule
/// - every rule names a platform and a pattern
/// - patterns compile and are within size limits
/// - every rule can produce a version (forced, or via a capture group)
///
/// Rule order is preserved exactly as written.
pub fn validate_and_compile(
    def: TableDefinition,
    is_builtin: bool,
) -> Result<PlatformTable, TableError> {
    let id = def.table.id.trim().to_string();

    if id.is_empty() {
        return Err(TableError::MissingField {
            table_id: "(empty)".to_string(),
            field: "table.id",
        });
    }
    if def.table.name.trim().is_empty() {
        return Err(TableError::MissingField {
            table_id: id,
            field: "table.name",
        });
    }
    if def.rules.is_empty() {
        return Err(TableError::NoRules { table_id: id });
    }
    if def.rules.len() > constants::MAX_RULES_PER_TABLE {
        return Err(TableError::TooManyRules {
            table_id: id,
            count: def.rules.len(),
            max: constants::MAX_RULES_PER_TABLE,
        });
    }

    let mut rules = Vec::with_capacity(def.rules.len());
    for (index, rule) in def.rules.into_iter().enumerate() {
        rules.push(compile_rule(&id, index, rule)?);
    }

    tracing::debug!(table_id = %id, rules = rules.len(), "Compiled platform table");

    Ok(PlatformTable {
        id,
        name: def.table.name,
        description: def.table.description,
        rules,
        is_builtin,
    })
}

fn compile_rule(table_id: &str, index: usize, def: RuleDef) -> Result<PlatformRule, TableError> {
    if def.platform.trim().is_empty() {
        return Err(TableError::MissingField {
            table_id: table_id.to_string(),
            field: "rule.platform",
        });
    }
    if def.pattern.is_empty() {
        return Err(TableError::MissingField {
            table_id: table_id.to_string(),
            field: "rule.pattern",
        });
    }

    let pattern = compile_regex(table_id, index, &def.pattern, def.case_insensitive)?;

    // captures_len() counts the implicit whole-match group.
    if def.force_version.is_none() && pattern.captures_len() < 2 {
        return Err(TableError::NoVersionSource {
            table_id: table_id.to_string(),
            rule: index,
            platform: def.platform,
        });
    }

    Ok(PlatformRule {
        platform: def.platform.trim().to_string(),
        pattern,
        force_version: def.force_version,
        extra: def.extra,
        note: def.note,
    })
}

/// Compile a rule pattern with length validation to prevent ReDoS.
fn compile_regex(
    table_id: &str,
    rule: usize,
    pattern: &str,
    case_insensitive: bool,
) -> Result<Regex, TableError> {
    if pattern.len() > constants::MAX_REGEX_PATTERN_LENGTH {
        return Err(TableError::RegexTooLong {
            table_id: table_id.to_string(),
            rule,
            length: pattern.len(),
            max_length: constants::MAX_REGEX_PATTERN_LENGTH,
        });
    }

    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|e| TableError::InvalidRegex {
            table_id: table_id.to_string(),
            rule,
            pattern: pattern.to_string(),
            source: e,
        })
}

// =============================================================================
// Built-in tables (embedded at compile time)
// =============================================================================

/// Embedded TOML content for built-in tables.
/// Each tuple is (filename, TOML content).
pub fn builtin_table_sources() -> Vec<(&'static str, &'static str)> {
    vec![(
        "enyo_default.toml",
        include_str!("../../tables/enyo_default.toml"),
    )]
}

/// Load and validate all built-in tables.
///
/// Invalid tables are logged and skipped (non-fatal).
pub fn load_builtin_tables() -> Vec<PlatformTable> {
    let mut tables = Vec::new();

    for (filename, content) in builtin_table_sources() {
        let path = format!("<builtin>/{filename}");
        match parse_table_toml(content, Path::new(&path))
            .and_then(|def| validate_and_compile(def, true))
        {
            Ok(table) => {
                tracing::debug!(table_id = %table.id, "Loaded built-in table");
                tables.push(table);
            }
            Err(e) => {
                // A broken built-in table is a bug, but we still degrade gracefully
                tracing::error!(file = filename, error = %e, "Failed to load built-in table");
            }
        }
    }

    tables
}

// =============================================================================
// Tests
// =============================================================================
