//! Command implementations.

pub mod completions;
pub mod init;
pub mod save;
pub mod status;
pub mod sync;
pub mod version;

use crate::config::{resolve_db_path, Settings};
use crate::error::{Error, Result};
use crate::storage::SqliteStorage;
use std::path::{Path, PathBuf};

/// Open the existing database for a command.
///
/// Fails with `NotInitialized` when the resolved path does not exist, so a
/// typo in `--db` never silently creates an empty table. Commands that only
/// read pass `read_only` and leave the file exactly as found.
fn open_storage(db_path: Option<&PathBuf>, read_only: bool) -> Result<(PathBuf, SqliteStorage)> {
    let settings = Settings::load()?;
    let db_path = resolve_db_path(db_path.map(PathBuf::as_path), &settings)
        .ok_or_else(|| Error::Config("Could not determine database location".to_string()))?;

    if !db_path.exists() {
        return Err(Error::NotInitialized { path: db_path });
    }

    let timeout = Some(settings.busy_timeout_ms());
    let storage = if read_only {
        SqliteStorage::open_read_only(&db_path, timeout)?
    } else {
        SqliteStorage::open_with_timeout(&db_path, timeout)?
    };
    Ok((db_path, storage))
}

/// Display a path for human output.
fn display(path: &Path) -> String {
    path.display().to_string()
}
