//! Sync command implementation (XML → jobs table).

use super::{display, open_storage};
use crate::error::Result;
use crate::sync::Importer;
use std::path::{Path, PathBuf};

/// Execute the sync command.
///
/// Prints `Inserted: N, updated: N, deleted: N, total: N.` on success.
///
/// # Errors
///
/// Returns an error if the database is missing, the document is invalid,
/// or the batch cannot be applied.
pub fn execute(file: &Path, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let dry_run = crate::is_dry_run();
    let (db_path, mut storage) = open_storage(db_path, dry_run)?;

    let stats = Importer::new(&mut storage)
        .dry_run(dry_run)
        .import_file(file)?;

    if json {
        let output = serde_json::json!({
            "success": true,
            "dry_run": dry_run,
            "file": display(file),
            "database": display(&db_path),
            "stats": stats,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else if dry_run {
        println!("Dry run, nothing applied. Would apply: {stats}");
    } else {
        println!("{stats}");
    }

    Ok(())
}
