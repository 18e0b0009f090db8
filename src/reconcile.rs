//! Local/remote task reconciliation.
//!
//! Pure recomputation: every call diffs the two snapshots from scratch, so
//! there is no cached state to go stale when either side changes.

use std::collections::HashMap;

use crate::models::{ReconciliationResult, Task};

/// Partitions two task collections by `number`.
///
/// Keys only on one side land in `unseen` (remote-only) or `unpushed`
/// (local-only). Keys on both sides with unequal records land in
/// `conflicting`, carrying the local version. Records equal on both sides
/// are omitted. The three partitions are pairwise disjoint by construction.
pub fn diff(local: &[Task], remote: &[Task]) -> ReconciliationResult {
    let local_by_number: HashMap<i64, &Task> =
        local.iter().map(|t| (t.number, t)).collect();
    let remote_by_number: HashMap<i64, &Task> =
        remote.iter().map(|t| (t.number, t)).collect();

    let mut result = ReconciliationResult::default();

    for task in remote {
        if !local_by_number.contains_key(&task.number) {
            result.unseen.push(task.clone());
        }
    }
    for task in local {
        match remote_by_number.get(&task.number) {
            None => result.unpushed.push(task.clone()),
            Some(remote_task) if *remote_task != task => {
                result.conflicting.push(task.clone());
            }
            Some(_) => {}
        }
    }
    result
}
