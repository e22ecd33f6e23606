// UAProbe - app/table_mgr.rs
//
// Manages loading of platform tables from both built-in sources
// (embedded in the binary) and user-defined TOML files on disk.
// User tables override built-in tables with the same ID.

use crate::core::model::PlatformTable;
use crate::core::table;
use crate::util::constants;
use crate::util::error::TableError;
use std::path::{Path, PathBuf};

/// Load all available tables: built-in first, then user-defined overrides.
///
/// Invalid tables are logged and skipped (non-fatal).
/// Returns the merged list and any non-fatal errors encountered.
pub fn load_all_tables(user_table_dir: Option<&Path>) -> (Vec<PlatformTable>, Vec<TableError>) {
    let mut tables = table::load_builtin_tables();
    let mut errors = Vec::new();

    tracing::debug!(builtin_count = tables.len(), "Loaded built-in tables");

    if let Some(dir) = user_table_dir {
        if dir.is_dir() {
            let (user_tables, user_errors) = load_user_tables(dir);
            errors.extend(user_errors);

            for user_table in user_tables {
                if let Some(pos) = tables.iter().position(|t| t.id == user_table.id) {
                    tracing::info!(table_id = %user_table.id, "User table overrides existing table");
                    tables[pos] = user_table;
                } else {
                    tracing::info!(table_id = %user_table.id, "Loaded user-defined table");
                    tables.push(user_table);
                }
            }
        } else {
            tracing::debug!(
                dir = %dir.display(),
                "User table directory does not exist (skipping)"
            );
        }
    }

    if tables.len() > constants::MAX_TABLES {
        tracing::warn!(
            count = tables.len(),
            max = constants::MAX_TABLES,
            "Too many tables loaded, truncating"
        );
        errors.push(TableError::TooManyTables {
            count: tables.len(),
            max: constants::MAX_TABLES,
        });
        tables.truncate(constants::MAX_TABLES);
    }

    (tables, errors)
}

/// Pick the table with the given ID.
pub fn select_table<'a>(
    tables: &'a [PlatformTable],
    id: &str,
) -> Result<&'a PlatformTable, TableError> {
    tables
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| TableError::UnknownTable {
            id: id.to_string(),
            available: tables.iter().map(|t| t.id.clone()).collect(),
        })
}

/// Load user-defined tables from a directory, in file-name order.
fn load_user_tables(dir: &Path) -> (Vec<PlatformTable>, Vec<TableError>) {
    let mut tables = Vec::new();
    let mut errors = Vec::new();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            errors.push(TableError::Io {
                path: dir.to_path_buf(),
                source: e,
            });
            return (tables, errors);
        }
    };

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry_result in entries {
        match entry_result {
            Ok(entry) => paths.push(entry.path()),
            Err(e) => errors.push(TableError::Io {
                path: dir.to_path_buf(),
                source: e,
            }),
        }
    }
    paths.retain(|p| p.extension().and_then(|e| e.to_str()) == Some("toml"));
    paths.sort();

    for path in paths {
        match load_table_file(&path) {
            Ok(t) => tables.push(t),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping invalid table");
                errors.push(e);
            }
        }
    }

    (tables, errors)
}

/// Read, size-check, parse and compile a single user table file.
pub fn load_table_file(path: &Path) -> Result<PlatformTable, TableError> {
    let metadata = std::fs::metadata(path).map_err(|e| TableError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    if metadata.len() > constants::MAX_TABLE_FILE_SIZE {
        return Err(TableError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: constants::MAX_TABLE_FILE_SIZE,
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| TableError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    table::parse_table_toml(&content, path).and_then(|def| table::validate_and_compile(def, false))
}
