//! XML sync operations.
//!
//! This module reconciles the `jobs` table with an XML document:
//!
//! - **Codec**: XML document ↔ validated keyed job collection
//! - **Reconcile**: desired vs. current collection → insert/update/delete plan
//! - **Import**: document → plan → one atomic batch against the store
//! - **Export**: store snapshot → document, written atomically
//! - **Status**: stored job count and pending changes for a document
//!
//! # Example
//!
//! ```ignore
//! use jobsync::storage::SqliteStorage;
//! use jobsync::sync::{Exporter, Importer};
//!
//! let mut storage = SqliteStorage::open(db_path)?;
//!
//! // Merge a document into the table
//! let stats = Importer::new(&mut storage).import_file(Path::new("jobs.xml"))?;
//! println!("{stats}");
//!
//! // Write the table out
//! let stats = Exporter::new(&storage).save(Path::new("jobs.xml"))?;
//! ```

mod codec;
mod export;
mod file;
mod import;
mod reconcile;
mod status;
mod store;
mod types;

// Re-export main types and functions
pub use codec::{parse_document, serialize_document};
pub use export::{export_to_document, Exporter};
pub use file::{atomic_write, read_document};
pub use import::Importer;
pub use reconcile::reconcile;
pub use status::{get_sync_status, print_status};
pub use store::JobStore;
pub use types::{
    ExportStats, PendingChanges, ReconcilePlan, SyncError, SyncResult, SyncStats, SyncStatus,
};
