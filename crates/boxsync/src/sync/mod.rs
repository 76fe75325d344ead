//! Shared sync infrastructure.
//!
//! # Module Structure
//!
//! - `types` - Flow results and the [`SyncError`] taxonomy
//! - `progress` - Progress reporting: [`SyncProgress`], [`ProgressCallback`], [`emit()`]
//! - `filter` - Deduplication of fresh machines against tracked rows
//! - `engine` - The creation and reconciliation flows

mod engine;
mod filter;
mod progress;
mod types;

pub use engine::{reconcile_rows, seed_category};
pub use filter::filter_new;
pub use progress::{ProgressCallback, SyncProgress, emit};
pub use types::{ReconcileResult, Result, SeedResult, SyncError};
