//! Sync types for XML import/export.
//!
//! This module defines the reconciliation plan, the statistics reported to
//! the caller, and the sync error taxonomy.

use serde::Serialize;

use crate::model::Job;
use crate::validate::ValidationError;

/// Changes that transform the current table into the desired document.
///
/// Every natural key from either side lands in exactly one of `inserts`,
/// `updates`, `deletes`, or the `unchanged` count. Ordering within each
/// set is unspecified.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Jobs present only in the document (no id).
    pub inserts: Vec<Job>,
    /// Jobs whose description changed, carrying the stored id.
    pub updates: Vec<Job>,
    /// Stored jobs absent from the document.
    pub deletes: Vec<Job>,
    /// Number of jobs present on both sides with equal descriptions.
    pub unchanged: usize,
}

impl ReconcilePlan {
    /// Returns true if applying the plan would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }

    /// Summarize the plan as counts.
    #[must_use]
    pub fn stats(&self) -> SyncStats {
        SyncStats {
            inserted: self.inserts.len(),
            updated: self.updates.len(),
            deleted: self.deletes.len(),
            unchanged: self.unchanged,
            total: self.inserts.len() + self.updates.len() + self.unchanged,
        }
    }
}

/// Statistics for an import operation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    /// Number of jobs inserted.
    pub inserted: usize,
    /// Number of jobs whose description was updated.
    pub updated: usize,
    /// Number of jobs deleted.
    pub deleted: usize,
    /// Number of jobs left untouched.
    pub unchanged: usize,
    /// Number of jobs in the document.
    pub total: usize,
}

impl SyncStats {
    /// Total number of row mutations.
    #[must_use]
    pub fn changes(&self) -> usize {
        self.inserted + self.updated + self.deleted
    }
}

impl std::fmt::Display for SyncStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Inserted: {}, updated: {}, deleted: {}, total: {}.",
            self.inserted, self.updated, self.deleted, self.total
        )
    }
}

/// Statistics for an export operation.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ExportStats {
    /// Number of jobs written.
    pub jobs: usize,
    /// Size of the written document in bytes.
    pub bytes: usize,
}

/// Pending changes for a document, as reported by `status`.
#[derive(Debug, Clone, Serialize)]
pub struct PendingChanges {
    /// Path of the inspected document.
    pub file: String,
    /// What a sync would do.
    pub stats: SyncStats,
}

/// Sync status information.
#[derive(Debug, Clone, Serialize)]
pub struct SyncStatus {
    /// Number of jobs currently stored.
    pub stored_jobs: usize,
    /// Pending changes, when a document was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<PendingChanges>,
}

/// Sync-specific errors.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Structural violation in the XML document.
    #[error("Invalid format: {0}")]
    Format(String),

    /// Field-level violation in a job.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Input document not found.
    #[error("File not found: {0}")]
    FileNotFound(String),
}

impl SyncError {
    pub(crate) fn format(message: impl Into<String>) -> Self {
        Self::Format(message.into())
    }
}

impl From<rusqlite::Error> for SyncError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Result type for sync operations.
pub type SyncResult<T> = std::result::Result<T, SyncError>;
