//! Reconciliation of a desired job collection against the stored one.
//!
//! A single pass over the desired jobs classifies each natural key as an
//! insert, an update (description changed), or unchanged; whatever is left
//! of the current collection afterwards is deleted. Only descriptions are
//! compared because the natural key fields are immutable and `id` belongs
//! to the store.

use crate::model::JobMap;
use crate::sync::types::ReconcilePlan;

/// Compute the changes that turn `current` into `desired`.
///
/// `current` is consumed as the working copy: matched keys are removed from
/// it and the remainder becomes the delete set. Updated jobs carry the id of
/// the stored row they replace.
#[must_use]
pub fn reconcile(desired: JobMap, mut current: JobMap) -> ReconcilePlan {
    let mut plan = ReconcilePlan::default();

    for (key, mut job) in desired {
        match current.remove(&key) {
            None => {
                job.id = None;
                plan.inserts.push(job);
            }
            Some(stored) if stored.description == job.description => {
                plan.unchanged += 1;
            }
            Some(stored) => {
                job.id = stored.id;
                plan.updates.push(job);
            }
        }
    }

    plan.deletes = current.into_values().collect();
    plan
}
