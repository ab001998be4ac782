//! Job model for jobsync.
//!
//! A job is identified by its natural key, the `(dep_code, dep_job)` pair.
//! The numeric `id` belongs to the store and never takes part in equality
//! or lookup.

use std::collections::HashMap;
use std::fmt;

/// A keyed collection of jobs, unique by natural key.
pub type JobMap = HashMap<JobKey, Job>;

/// A job record as persisted in the `jobs` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Row id assigned by the store (`None` until persisted)
    pub id: Option<i64>,

    /// Department code (max 20 characters)
    pub dep_code: String,

    /// Department job title (max 100 characters)
    pub dep_job: String,

    /// Optional free-form description (max 255 characters)
    pub description: Option<String>,
}

impl Job {
    /// Create a job that has not been persisted yet.
    pub fn new(
        dep_code: impl Into<String>,
        dep_job: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            id: None,
            dep_code: dep_code.into(),
            dep_job: dep_job.into(),
            description,
        }
    }

    /// Attach a store-assigned id.
    #[must_use]
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Natural key of this job.
    #[must_use]
    pub fn key(&self) -> JobKey {
        JobKey::new(&self.dep_code, &self.dep_job)
    }
}

/// Natural key of a job: `(dep_code, dep_job)`, compared case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobKey {
    pub dep_code: String,
    pub dep_job: String,
}

impl JobKey {
    pub fn new(dep_code: impl Into<String>, dep_job: impl Into<String>) -> Self {
        Self {
            dep_code: dep_code.into(),
            dep_job: dep_job.into(),
        }
    }
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "depCode={}, depJob={}", self.dep_code, self.dep_job)
    }
}

/// Build a keyed collection from stored jobs.
///
/// The store guarantees unique natural keys; should it ever return a
/// repeat, the later row wins.
#[must_use]
pub fn index_by_key(jobs: Vec<Job>) -> JobMap {
    jobs.into_iter().map(|job| (job.key(), job)).collect()
}
