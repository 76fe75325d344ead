//! Shared sync types and errors.

use thiserror::Error;

use crate::htb::HtbError;
use crate::notion::NotionError;

/// Error from a sync flow: either side of the pipe can fail, and every
/// failure is fatal to the run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The challenge platform failed.
    #[error("source: {0}")]
    Source(#[from] HtbError),

    /// The tracker database failed.
    #[error("sink: {0}")]
    Sink(#[from] NotionError),
}

/// Result type for sync flows.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Result of a creation flow for one lifecycle category.
#[derive(Debug, Default)]
pub struct SeedResult {
    /// Number of machines fetched from the platform.
    pub fetched: usize,
    /// Number skipped because a tracked row already exists.
    pub skipped: usize,
    /// Number of rows created.
    pub created: usize,
}

/// Result of a reconciliation pass.
#[derive(Debug, Default)]
pub struct ReconcileResult {
    /// Number of tracked rows refreshed.
    pub processed: usize,
    /// How many ended up Unreleased.
    pub unreleased: usize,
    /// How many ended up Active.
    pub active: usize,
    /// How many ended up Retired.
    pub retired: usize,
    /// Retiring-date side patches applied.
    pub retiring_patched: usize,
    /// Retiring relations whose target had no tracked row.
    pub retiring_missing: usize,
}
