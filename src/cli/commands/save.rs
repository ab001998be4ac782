//! Save command implementation (jobs table → XML).

use super::{display, open_storage};
use crate::error::Result;
use crate::sync::Exporter;
use std::path::{Path, PathBuf};

/// Execute the save command.
///
/// # Errors
///
/// Returns an error if the database is missing or the file cannot be
/// written.
pub fn execute(file: &Path, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let (db_path, storage) = open_storage(db_path, true)?;

    let stats = Exporter::new(&storage).save(file)?;

    if json {
        let output = serde_json::json!({
            "success": true,
            "file": display(file),
            "database": display(&db_path),
            "stats": stats,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("Saved to file '{}'. {} jobs saved", file.display(), stats.jobs);
    }

    Ok(())
}
