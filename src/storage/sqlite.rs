//! SQLite storage implementation.
//!
//! This module provides the storage backend for jobsync using SQLite.
//! Writes go through [`JobBatch`], a scoped transaction: statements run
//! inside one IMMEDIATE transaction that commits only when
//! [`JobBatch::commit`] is called and rolls back when the batch is dropped.

use crate::error::{Error, Result};
use crate::model::Job;
use crate::storage::schema::{apply_schema, is_current};
use rusqlite::{Connection, OpenFlags, Transaction, TransactionBehavior};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Default busy timeout when the configuration does not set one.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// SQLite-based storage backend.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open a database at the given path.
    ///
    /// Creates the database and applies schema if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, None)
    }

    /// Open a database with an optional busy timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open_with_timeout(path: &Path, timeout_ms: Option<u64>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_millis(
            timeout_ms.unwrap_or(DEFAULT_BUSY_TIMEOUT_MS),
        ))?;

        apply_schema(&conn)?;
        debug!(path = %path.display(), "Opened database");
        Ok(Self { conn })
    }

    /// Open an existing database for reading.
    ///
    /// No pragmas or migrations run and the connection is `query_only`, so
    /// the file is left as found. The database must already carry the
    /// current schema.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaOutdated`] if the schema or a migration is
    /// missing, or a database error if the file cannot be opened.
    pub fn open_read_only(path: &Path, timeout_ms: Option<u64>) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(Duration::from_millis(
            timeout_ms.unwrap_or(DEFAULT_BUSY_TIMEOUT_MS),
        ))?;
        conn.pragma_update(None, "query_only", true)?;

        if !is_current(&conn)? {
            return Err(Error::SchemaOutdated {
                path: path.to_path_buf(),
            });
        }
        debug!(path = %path.display(), "Opened database for reading");
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    // ==================
    // Job Operations
    // ==================

    /// Load every stored job, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_jobs(&self) -> Result<Vec<Job>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, dep_code, dep_job, description FROM jobs ORDER BY id")?;

        let jobs = stmt
            .query_map([], |row| {
                Ok(Job {
                    id: Some(row.get(0)?),
                    dep_code: row.get(1)?,
                    dep_job: row.get(2)?,
                    description: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        info!(count = jobs.len(), "Loaded jobs from database");
        Ok(jobs)
    }

    /// Count stored jobs.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_jobs(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM jobs", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Begin a write batch.
    ///
    /// Takes the write lock immediately so the batch sees a stable table.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started.
    pub fn begin_batch(&mut self) -> Result<JobBatch<'_>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        info!("Start transaction");
        Ok(JobBatch { tx })
    }

    /// Apply inserts, updates and deletes as one atomic unit.
    ///
    /// Updates and deletes are matched by id. If any statement fails,
    /// nothing is committed.
    ///
    /// # Errors
    ///
    /// Returns the first failing statement's error.
    pub fn apply_changes(&mut self, inserts: &[Job], updates: &[Job], deletes: &[Job]) -> Result<()> {
        let batch = self.begin_batch()?;

        for job in inserts {
            batch.insert(job)?;
        }
        for job in updates {
            batch.update_description(job)?;
        }
        for job in deletes {
            batch.delete(job)?;
        }

        batch.commit()
    }
}

/// A scoped write transaction over the `jobs` table.
///
/// Dropping a batch without calling [`JobBatch::commit`] rolls back every
/// statement it ran.
pub struct JobBatch<'conn> {
    tx: Transaction<'conn>,
}

impl JobBatch<'_> {
    /// Insert a job and return its new id. Any id on `job` is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (e.g. duplicate natural key).
    pub fn insert(&self, job: &Job) -> Result<i64> {
        let mut stmt = self
            .tx
            .prepare_cached("INSERT INTO jobs (dep_code, dep_job, description) VALUES (?1, ?2, ?3)")?;
        stmt.execute(rusqlite::params![job.dep_code, job.dep_job, job.description])?;
        Ok(self.tx.last_insert_rowid())
    }

    /// Replace the description of the row with `job.id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the job has no id, no row has that id, or the
    /// update fails.
    pub fn update_description(&self, job: &Job) -> Result<()> {
        let id = require_id(job)?;
        let mut stmt = self
            .tx
            .prepare_cached("UPDATE jobs SET description = ?1 WHERE id = ?2")?;
        let changed = stmt.execute(rusqlite::params![job.description, id])?;
        if changed == 0 {
            return Err(Error::JobRowMissing { id });
        }
        Ok(())
    }

    /// Delete the row with `job.id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the job has no id, no row has that id, or the
    /// delete fails.
    pub fn delete(&self, job: &Job) -> Result<()> {
        let id = require_id(job)?;
        let mut stmt = self.tx.prepare_cached("DELETE FROM jobs WHERE id = ?1")?;
        let changed = stmt.execute([id])?;
        if changed == 0 {
            return Err(Error::JobRowMissing { id });
        }
        Ok(())
    }

    /// Commit every statement run in this batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails; the batch is rolled back.
    pub fn commit(self) -> Result<()> {
        self.tx.commit()?;
        info!("Transaction successful");
        Ok(())
    }
}

fn require_id(job: &Job) -> Result<i64> {
    job.id.ok_or_else(|| Error::MissingJobId {
        key: job.key().to_string(),
    })
}
