//! Challenge-platform (source) API integration.

mod client;
mod error;
mod rate_limit;
mod types;

pub use client::HtbClient;
pub use error::{HtbError, short_error_message};
pub use rate_limit::{QUOTA_LOW_WATER, QUOTA_PAUSE, QuotaGuard};
pub use types::{LifecycleStatus, Machine, MachineCategory, RetiringRef, Tag};
