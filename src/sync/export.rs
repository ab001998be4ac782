//! XML export functionality.
//!
//! Export is a snapshot: the document written represents every stored job,
//! in store order, and replaces the target file atomically.

use std::path::Path;

use tracing::info;

use crate::model::Job;
use crate::sync::codec::serialize_document;
use crate::sync::file::atomic_write;
use crate::sync::store::JobStore;
use crate::sync::types::{ExportStats, SyncResult};

/// Serialize jobs into an XML document.
///
/// # Errors
///
/// Returns an error if the XML writer fails.
pub fn export_to_document(jobs: &[Job]) -> SyncResult<Vec<u8>> {
    serialize_document(jobs)
}

/// Exporter for XML job documents.
pub struct Exporter<'a, S: JobStore> {
    store: &'a S,
}

impl<'a, S: JobStore> Exporter<'a, S> {
    /// Create a new exporter reading from `store`.
    #[must_use]
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Write every stored job to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or the file cannot be
    /// written. An existing file is left untouched on failure.
    pub fn save(&self, path: &Path) -> SyncResult<ExportStats> {
        info!(file = %path.display(), "Saving into file");

        let jobs = self.store.load_all()?;
        let document = export_to_document(&jobs)?;
        atomic_write(path, &document)?;

        let stats = ExportStats {
            jobs: jobs.len(),
            bytes: document.len(),
        };
        info!(jobs = stats.jobs, bytes = stats.bytes, "Saved document");
        Ok(stats)
    }
}
