//! Progress reporting types for sync operations.
//!
//! A unified event stream consumed by the CLI's progress reporter; the
//! library emits events through an optional callback and never prints.

/// Progress events emitted during creation and reconciliation flows.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum SyncProgress {
    /// Starting to fetch a machine list.
    FetchingMachines {
        /// Category label ("active", "unreleased", "retired").
        category: String,
    },

    /// Finished fetching a machine list.
    FetchComplete {
        /// Category label.
        category: String,
        /// Number of machines fetched.
        total: usize,
    },

    /// Starting to create rows for a category after deduplication.
    CreatingRows {
        /// Category label.
        category: String,
        /// Number of unseen machines to create.
        fresh: usize,
        /// Number of machines skipped as already tracked.
        skipped: usize,
    },

    /// A row was created.
    RowCreated {
        /// Machine ID.
        id: u64,
        /// Machine name.
        name: String,
        /// 1-based position within this creation flow.
        index: usize,
        /// Total rows this flow will create.
        total: usize,
    },

    /// Starting the reconciliation pass.
    Reconciling {
        /// Number of tracked rows to refresh.
        total: usize,
    },

    /// A tracked row was refreshed.
    RowReconciled {
        /// Machine ID.
        id: u64,
        /// Machine name.
        name: String,
        /// Lifecycle status written to the row.
        status: String,
        /// 1-based position within the pass.
        index: usize,
        /// Total rows in the pass.
        total: usize,
    },

    /// The retiring target of an unreleased machine got its date patched.
    RetiringDatePatched {
        /// Unreleased machine ID.
        id: u64,
        /// Machine ID of the box being retired.
        target_id: u64,
    },

    /// An unreleased machine names a retiring target with no tracked row;
    /// the side-patch was skipped.
    RetiringTargetMissing {
        /// Unreleased machine ID.
        id: u64,
        /// Machine ID of the box being retired.
        target_id: u64,
    },

    /// Warning message (non-fatal).
    Warning {
        /// Warning message.
        message: String,
    },
}

/// Callback for progress updates during sync operations.
pub type ProgressCallback = Box<dyn Fn(SyncProgress) + Send + Sync>;

/// Emit a progress event if a callback is provided.
#[inline]
pub fn emit(on_progress: Option<&ProgressCallback>, event: SyncProgress) {
    if let Some(cb) = on_progress {
        cb(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn emit_with_callback_invokes_it() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);

        let callback: ProgressCallback = Box::new(move |_event| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        emit(
            Some(&callback),
            SyncProgress::FetchComplete {
                category: "active".to_string(),
                total: 10,
            },
        );
        emit(Some(&callback), SyncProgress::Reconciling { total: 3 });

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn emit_without_callback_is_a_no_op() {
        emit(
            None,
            SyncProgress::Warning {
                message: "test".to_string(),
            },
        );
    }

    #[test]
    fn events_record_ordering_through_callback() {
        let events = Arc::new(std::sync::Mutex::new(Vec::new()));
        let events_clone = Arc::clone(&events);

        let callback: ProgressCallback = Box::new(move |event| {
            events_clone.lock().unwrap().push(format!("{:?}", event));
        });

        emit(
            Some(&callback),
            SyncProgress::FetchingMachines {
                category: "retired".to_string(),
            },
        );
        emit(
            Some(&callback),
            SyncProgress::FetchComplete {
                category: "retired".to_string(),
                total: 250,
            },
        );
        emit(
            Some(&callback),
            SyncProgress::CreatingRows {
                category: "retired".to_string(),
                fresh: 5,
                skipped: 245,
            },
        );

        let recorded = events.lock().unwrap();
        assert_eq!(recorded.len(), 3);
        assert!(recorded[0].contains("FetchingMachines"));
        assert!(recorded[1].contains("FetchComplete"));
        assert!(recorded[2].contains("CreatingRows"));
    }
}
