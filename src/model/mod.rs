//! Data models for jobsync.
//!
//! - Job
//! - JobKey (natural key)
//! - JobMap (keyed collection)

pub mod job;

pub use job::{index_by_key, Job, JobKey, JobMap};
