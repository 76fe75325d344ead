//! Deduplication of freshly fetched machines against tracked rows.

use std::collections::HashSet;

use crate::htb::Machine;
use crate::notion::TrackedRow;

/// Return the machines whose ID is not yet mirrored by any tracked row.
///
/// Order of `fresh` is preserved. Used by the creation flows only; the
/// reconciliation pass operates on the tracked rows themselves.
#[must_use]
pub fn filter_new(existing: &[TrackedRow], fresh: Vec<Machine>) -> Vec<Machine> {
    let seen: HashSet<u64> = existing.iter().map(|row| row.machine_id).collect();

    fresh
        .into_iter()
        .filter(|machine| !seen.contains(&machine.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(id: u64) -> Machine {
        serde_json::from_str(&format!(
            r#"{{"id": {id}, "name": "m{id}", "os": "Linux",
                "release": "2020-01-01T00:00:00Z",
                "difficultyText": "Easy", "difficulty": 20}}"#
        ))
        .unwrap()
    }

    fn row(machine_id: u64) -> TrackedRow {
        TrackedRow {
            page_id: format!("page-{machine_id}"),
            machine_id,
            name: format!("m{machine_id}"),
        }
    }

    #[test]
    fn returns_only_unseen_machines() {
        let existing = vec![row(1), row(3)];
        let fresh = vec![machine(1), machine(2), machine(3), machine(4)];

        let result = filter_new(&existing, fresh);
        let ids: Vec<u64> = result.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn preserves_fresh_order() {
        let existing = vec![row(5)];
        let fresh = vec![machine(9), machine(5), machine(2), machine(7)];

        let result = filter_new(&existing, fresh);
        let ids: Vec<u64> = result.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![9, 2, 7]);
    }

    #[test]
    fn is_idempotent() {
        let existing = vec![row(1), row(2)];
        let fresh = vec![machine(1), machine(3), machine(4)];

        let once = filter_new(&existing, fresh);
        let once_ids: Vec<u64> = once.iter().map(|m| m.id).collect();
        let twice = filter_new(&existing, once);
        let twice_ids: Vec<u64> = twice.iter().map(|m| m.id).collect();
        assert_eq!(once_ids, twice_ids);
    }

    #[test]
    fn empty_snapshot_passes_everything_through() {
        let fresh = vec![machine(1), machine(2)];
        let result = filter_new(&[], fresh);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn empty_fresh_list_yields_nothing() {
        let existing = vec![row(1)];
        assert!(filter_new(&existing, Vec::new()).is_empty());
    }
}
