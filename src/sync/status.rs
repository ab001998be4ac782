//! Sync status display.
//!
//! Reports how many jobs are stored and, for a given document, what a sync
//! would change, without applying anything.

use std::path::Path;

use colored::Colorize;

use crate::sync::file::read_document;
use crate::sync::import::Importer;
use crate::sync::store::JobStore;
use crate::sync::types::{PendingChanges, SyncResult, SyncStatus};

/// Get the current sync status, optionally against a document.
///
/// # Errors
///
/// Returns an error if the store cannot be read or the document cannot be
/// read, parsed or validated.
pub fn get_sync_status<S: JobStore>(store: &mut S, document: Option<&Path>) -> SyncResult<SyncStatus> {
    let stored_jobs = store.load_all()?.len();

    let pending = match document {
        Some(path) => {
            let bytes = read_document(path)?;
            let plan = Importer::new(store).plan(&bytes)?;
            Some(PendingChanges {
                file: path.display().to_string(),
                stats: plan.stats(),
            })
        }
        None => None,
    };

    Ok(SyncStatus {
        stored_jobs,
        pending,
    })
}

/// Print sync status in human-readable form.
pub fn print_status(status: &SyncStatus) {
    println!("{}", "Database:".bold());
    println!("  Stored jobs: {}", status.stored_jobs);

    let Some(pending) = &status.pending else {
        return;
    };

    println!();
    println!("{} {}", "Pending changes for".bold(), pending.file);
    let stats = &pending.stats;
    if stats.changes() == 0 {
        println!("  {}", "In sync".green());
    } else {
        println!("  Insert:    {}", stats.inserted.to_string().green());
        println!("  Update:    {}", stats.updated.to_string().yellow());
        println!("  Delete:    {}", stats.deleted.to_string().red());
    }
    println!("  Unchanged: {}", stats.unchanged);
    println!("  Total:     {}", stats.total);
}
