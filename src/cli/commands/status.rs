//! Status command implementation.

use super::{display, open_storage};
use crate::error::Result;
use crate::sync::{get_sync_status, print_status};
use std::path::PathBuf;

/// Execute the status command.
///
/// With a file, reports what `sync` would change; nothing is applied.
///
/// # Errors
///
/// Returns an error if the database is missing or the file is invalid.
pub fn execute(file: Option<&PathBuf>, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let (db_path, mut storage) = open_storage(db_path, true)?;

    let status = get_sync_status(&mut storage, file.map(PathBuf::as_path))?;

    if json {
        let output = serde_json::json!({
            "database": display(&db_path),
            "status": status,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("Database file: {}", db_path.display());
        println!();
        print_status(&status);
    }

    Ok(())
}
