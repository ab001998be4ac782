//! The record store seen by the sync engine.
//!
//! Import and export only need two things from storage: a snapshot of every
//! stored job and an atomic batch apply. [`JobStore`] captures that contract
//! so the engine stays independent of the SQLite backend.

use crate::model::Job;
use crate::storage::SqliteStorage;
use crate::sync::types::{ReconcilePlan, SyncError, SyncResult};

/// Storage collaborator for import and export.
pub trait JobStore {
    /// Every stored job, each with its id, in store order.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Database`] if the store cannot be read.
    fn load_all(&self) -> SyncResult<Vec<Job>>;

    /// Apply a plan all-or-nothing. Updates and deletes match rows by id.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Database`] if any change fails; no change from
    /// the plan is visible afterwards.
    fn apply_batch(&mut self, plan: &ReconcilePlan) -> SyncResult<()>;
}

impl JobStore for SqliteStorage {
    fn load_all(&self) -> SyncResult<Vec<Job>> {
        self.list_jobs()
            .map_err(|e| SyncError::Database(e.to_string()))
    }

    fn apply_batch(&mut self, plan: &ReconcilePlan) -> SyncResult<()> {
        self.apply_changes(&plan.inserts, &plan.updates, &plan.deletes)
            .map_err(|e| SyncError::Database(e.to_string()))
    }
}
