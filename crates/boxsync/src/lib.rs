//! boxsync - one-way sync of challenge-platform machines into a Notion
//! database.
//!
//! The library is split by side of the pipe:
//!
//! - [`htb`] - the challenge-platform (source) client: machine lists, single
//!   machine profiles, tags, and the header-driven quota guard.
//! - [`notion`] - the tracker-database (sink) client and the property
//!   mapper.
//! - [`sync`] - the flows tying them together: category creation and the
//!   reconciliation pass that refreshes tracked rows, including the
//!   retiring-date side patch.
//! - [`http`] - the transport boundary both clients sit on.
//!
//! # Example
//!
//! ```ignore
//! use boxsync::htb::{HtbClient, MachineCategory, QuotaGuard};
//! use boxsync::notion::NotionClient;
//! use boxsync::sync::{reconcile_rows, seed_category};
//!
//! let source = HtbClient::new(&htb_url, &htb_token, Some(QuotaGuard::default()))?;
//! let sink = NotionClient::new(&notion_url, &notion_token, &database_id)?;
//!
//! let snapshot = sink.list_rows().await?;
//! seed_category(&source, &sink, &snapshot, MachineCategory::Active, None).await?;
//! reconcile_rows(&source, &sink, &snapshot, None).await?;
//! ```

pub mod htb;
pub mod http;
pub mod notion;
pub mod sync;

pub use htb::{HtbClient, HtbError, LifecycleStatus, Machine, MachineCategory, QuotaGuard, Tag};
pub use notion::{NotionClient, NotionError, PropertyMode, TrackedRow, map_to_properties};
pub use sync::{ReconcileResult, SeedResult, SyncError, SyncProgress, filter_new};
