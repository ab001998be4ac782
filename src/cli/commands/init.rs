//! Initialize the jobs database.
//!
//! Creates the database file (and its parent directory) at the resolved
//! location and applies the schema. When the settings file is missing, a
//! template is written next to it so the database location can be pinned.

use crate::config::{config_path, resolve_db_path, Settings};
use crate::error::{Error, Result};
use crate::storage::SqliteStorage;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct InitOutput {
    database: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<PathBuf>,
}

/// Execute the init command.
///
/// # Errors
///
/// Returns an error if the database already exists (without `force`), or
/// the directory or database cannot be created.
pub fn execute(db_path: Option<&PathBuf>, force: bool, json: bool) -> Result<()> {
    let settings = Settings::load()?;
    let db_path = resolve_db_path(db_path.map(PathBuf::as_path), &settings)
        .ok_or_else(|| Error::Config("Could not determine database location".to_string()))?;

    create_database(&db_path, force, settings.busy_timeout_ms())?;
    let config = write_config_template()?;

    if json {
        let output = InitOutput {
            database: db_path,
            config,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("Initialized jobs database");
        println!("  Database: {}", db_path.display());
        if let Some(config) = config {
            println!("  Config:   {}", config.display());
        }
    }

    Ok(())
}

fn create_database(db_path: &Path, force: bool, busy_timeout_ms: u64) -> Result<()> {
    if db_path.exists() && !force {
        return Err(Error::AlreadyInitialized {
            path: db_path.to_path_buf(),
        });
    }

    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    // Schema statements are idempotent, so --force only re-applies them.
    SqliteStorage::open_with_timeout(db_path, Some(busy_timeout_ms))?;
    Ok(())
}

/// Write a settings template if none exists. Returns the path when written.
fn write_config_template() -> Result<Option<PathBuf>> {
    let Some(path) = config_path() else {
        return Ok(None);
    };
    if path.exists() {
        return Ok(None);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let template = serde_json::to_string_pretty(&Settings {
        database: None,
        busy_timeout_ms: Some(crate::storage::DEFAULT_BUSY_TIMEOUT_MS),
    })?;
    fs::write(&path, template + "\n")?;
    Ok(Some(path))
}
