//! jobsync - keep a SQL table of jobs in step with an XML document
//!
//! This crate provides the core functionality for the `jobsync` CLI tool.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`model`] - The `Job` record and its natural key
//! - [`validate`] - Field length rules applied to parsed records
//! - [`storage`] - SQLite database layer
//! - [`sync`] - XML codec, reconciliation, import and export
//! - [`config`] - Configuration management
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod storage;
pub mod sync;
pub mod validate;

pub use error::{Error, Result};

/// Global dry-run flag for `--dry-run`.
///
/// When set, `sync` computes its changes and reports them without
/// writing to the database.
pub static DRY_RUN: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Check if dry-run mode is active.
#[inline]
pub fn is_dry_run() -> bool {
    DRY_RUN.load(std::sync::atomic::Ordering::Relaxed)
}
