//! Discovery of database files in the databases folder.

use std::fs;
use std::path::{Path, PathBuf};

use super::format::DATABASE_EXTENSION;
use crate::errors::{CredVaultError, Result};

/// A database file found in the folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseInfo {
    /// File name, e.g. `vault.json`.
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

/// Scan `folder` for `*.json` database files, sorted by name.
///
/// Hidden files (including interrupted `.name.json.tmp` writes) are ignored.
pub fn list_databases(folder: &Path) -> Result<Vec<DatabaseInfo>> {
    if !folder.is_dir() {
        return Err(CredVaultError::NotFound(folder.to_path_buf()));
    }

    let mut databases = Vec::new();

    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        let path = entry.path();

        if path.extension().and_then(|ext| ext.to_str()) != Some(DATABASE_EXTENSION) {
            continue;
        }
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }

        let metadata = entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }

        databases.push(DatabaseInfo {
            name,
            path,
            size: metadata.len(),
        });
    }

    databases.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(databases)
}

/// Resolve a user-supplied database name to its file inside `folder`.
///
/// Accepts both `vault` and `vault.json`.
pub fn database_path(folder: &Path, name: &str) -> PathBuf {
    folder.join(file_name_for(name))
}

/// The file name a database called `name` is stored under.
pub fn file_name_for(name: &str) -> String {
    let suffix = format!(".{DATABASE_EXTENSION}");
    if name.ends_with(&suffix) {
        name.to_string()
    } else {
        format!("{name}{suffix}")
    }
}
