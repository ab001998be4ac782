//! XML import functionality.
//!
//! An import parses the document into the desired collection, loads the
//! current collection from the store, reconciles the two, and applies the
//! resulting plan as one batch. Nothing touches the store until the whole
//! document has parsed and validated.

use std::path::Path;

use tracing::info;

use crate::model::index_by_key;
use crate::sync::codec::parse_document;
use crate::sync::file::read_document;
use crate::sync::reconcile::reconcile;
use crate::sync::store::JobStore;
use crate::sync::types::{ReconcilePlan, SyncResult, SyncStats};

/// Importer for XML job documents.
pub struct Importer<'a, S: JobStore> {
    store: &'a mut S,
    dry_run: bool,
}

impl<'a, S: JobStore> Importer<'a, S> {
    /// Create a new importer that applies its changes.
    #[must_use]
    pub fn new(store: &'a mut S) -> Self {
        Self {
            store,
            dry_run: false,
        }
    }

    /// Compute plans without applying them.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Compute the changes a document would make, without applying them.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is invalid or the store cannot be read.
    pub fn plan(&self, bytes: &[u8]) -> SyncResult<ReconcilePlan> {
        let desired = parse_document(bytes)?;
        let current = index_by_key(self.store.load_all()?);

        let plan = reconcile(desired, current);
        info!(
            inserts = plan.inserts.len(),
            updates = plan.updates.len(),
            deletes = plan.deletes.len(),
            unchanged = plan.unchanged,
            "Created lists with insertions, updates and deletions"
        );
        Ok(plan)
    }

    /// Reconcile the store with a document held in memory.
    ///
    /// # Errors
    ///
    /// Returns a format or validation error for a bad document (the store is
    /// untouched), or a database error if the batch fails (nothing is
    /// committed).
    pub fn reconcile_from_document(&mut self, bytes: &[u8]) -> SyncResult<SyncStats> {
        let plan = self.plan(bytes)?;
        let stats = plan.stats();

        if self.dry_run {
            info!("Dry run, no changes applied");
        } else if plan.is_empty() {
            info!("Nothing to apply");
        } else {
            self.store.apply_batch(&plan)?;
        }

        info!(
            inserted = stats.inserted,
            updated = stats.updated,
            deleted = stats.deleted,
            total = stats.total,
            "Synchronization finished"
        );
        Ok(stats)
    }

    /// Reconcile the store with a document file.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::FileNotFound`](crate::sync::SyncError::FileNotFound)
    /// if the file is missing, plus everything
    /// [`reconcile_from_document`](Self::reconcile_from_document) returns.
    pub fn import_file(&mut self, path: &Path) -> SyncResult<SyncStats> {
        info!(file = %path.display(), "Start synchronization");
        let bytes = read_document(path)?;
        self.reconcile_from_document(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Job;
    use crate::storage::SqliteStorage;
    use crate::sync::types::SyncError;
    use std::fs;
    use tempfile::TempDir;

    const DOC: &str = "<jobs>\
        <job><depCode>K1</depCode><depJob>Engineer</depJob><description>a</description></job>\
        <job><depCode>K3</depCode><depJob>Engineer</depJob><description>c</description></job>\
        </jobs>";

    fn seeded() -> SqliteStorage {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage
            .apply_changes(
                &[
                    Job::new("K1", "Engineer", Some("a".to_string())),
                    Job::new("K2", "Engineer", Some("b".to_string())),
                ],
                &[],
                &[],
            )
            .unwrap();
        storage
    }

    fn codes(storage: &SqliteStorage) -> Vec<String> {
        let mut codes: Vec<_> = storage
            .list_jobs()
            .unwrap()
            .into_iter()
            .map(|j| j.dep_code)
            .collect();
        codes.sort();
        codes
    }

    #[test]
    fn test_import_applies_plan() {
        let mut storage = seeded();
        let k1_id = storage.list_jobs().unwrap()[0].id;

        let stats = Importer::new(&mut storage)
            .reconcile_from_document(DOC.as_bytes())
            .unwrap();

        assert_eq!(stats.inserted, 1);
        assert_eq!(stats.updated, 0);
        assert_eq!(stats.deleted, 1);
        assert_eq!(stats.total, 2);
        assert_eq!(codes(&storage), vec!["K1", "K3"]);
        // Unchanged row keeps its identity
        assert_eq!(storage.list_jobs().unwrap()[0].id, k1_id);
    }

    #[test]
    fn test_import_updates_description_in_place() {
        let mut storage = seeded();
        let doc = "<jobs>\
            <job><depCode>K1</depCode><depJob>Engineer</depJob></job>\
            <job><depCode>K2</depCode><depJob>Engineer</depJob><description>b</description></job>\
            </jobs>";

        let stats = Importer::new(&mut storage)
            .reconcile_from_document(doc.as_bytes())
            .unwrap();

        assert_eq!(stats.updated, 1);
        assert_eq!(stats.unchanged, 1);
        let k1 = &storage.list_jobs().unwrap()[0];
        assert_eq!(k1.dep_code, "K1");
        assert_eq!(k1.description, None);
    }

    #[test]
    fn test_import_is_idempotent() {
        let mut storage = seeded();
        Importer::new(&mut storage)
            .reconcile_from_document(DOC.as_bytes())
            .unwrap();

        let stats = Importer::new(&mut storage)
            .reconcile_from_document(DOC.as_bytes())
            .unwrap();

        assert_eq!(stats.changes(), 0);
        assert_eq!(stats.unchanged, 2);
    }

    #[test]
    fn test_dry_run_leaves_store_alone() {
        let mut storage = seeded();

        let stats = Importer::new(&mut storage)
            .dry_run(true)
            .reconcile_from_document(DOC.as_bytes())
            .unwrap();

        assert_eq!(stats.changes(), 2);
        assert_eq!(codes(&storage), vec!["K1", "K2"]);
    }

    #[test]
    fn test_invalid_document_leaves_store_alone() {
        let mut storage = seeded();
        let doc = "<jobs>\
            <job><depCode>K9</depCode><depJob>Engineer</depJob></job>\
            <job><depCode>K9</depCode><depJob>Engineer</depJob></job>\
            </jobs>";

        let result = Importer::new(&mut storage).reconcile_from_document(doc.as_bytes());

        assert!(matches!(result, Err(SyncError::Format(_))));
        assert_eq!(codes(&storage), vec!["K1", "K2"]);
    }

    #[test]
    fn test_import_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("jobs.xml");
        fs::write(&path, DOC).unwrap();
        let mut storage = seeded();

        let stats = Importer::new(&mut storage).import_file(&path).unwrap();

        assert_eq!(stats.total, 2);
    }

    #[test]
    fn test_import_missing_file() {
        let mut storage = seeded();
        let result = Importer::new(&mut storage).import_file(Path::new("/nonexistent/jobs.xml"));
        assert!(matches!(result, Err(SyncError::FileNotFound(_))));
    }

    /// A store whose batch apply always fails.
    struct FailingStore(Vec<Job>);

    impl JobStore for FailingStore {
        fn load_all(&self) -> SyncResult<Vec<Job>> {
            Ok(self.0.clone())
        }

        fn apply_batch(&mut self, _plan: &ReconcilePlan) -> SyncResult<()> {
            Err(SyncError::Database("connection lost".to_string()))
        }
    }

    #[test]
    fn test_store_failure_propagates() {
        let mut store = FailingStore(vec![Job::new("K2", "Engineer", None).with_id(2)]);

        let result = Importer::new(&mut store).reconcile_from_document(DOC.as_bytes());

        assert!(matches!(result, Err(SyncError::Database(_))));
    }

    #[test]
    fn test_empty_plan_skips_apply() {
        let mut store = FailingStore(vec![]);
        let stats = Importer::new(&mut store)
            .reconcile_from_document(b"<jobs/>")
            .unwrap();
        assert_eq!(stats, SyncStats::default());
    }
}
