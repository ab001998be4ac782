//! SQLite storage layer for jobsync.
//!
//! This module provides the persistence layer using SQLite with:
//! - WAL mode
//! - Scoped transactions for atomic batch writes
//! - Embedded migrations
//!
//! # Submodules
//!
//! - [`migrations`] - Embedded schema migrations
//! - [`schema`] - Database schema definitions
//! - [`sqlite`] - Main SQLite storage implementation

pub mod migrations;
pub mod schema;
pub mod sqlite;

pub use sqlite::{JobBatch, SqliteStorage, DEFAULT_BUSY_TIMEOUT_MS};
