//! Tracker-database (sink) API integration.
//!
//! # Module Structure
//!
//! - `error` - Error types for database operations
//! - `types` - Row and response types
//! - `client` - The database client
//! - `properties` - Mapping machine records to row properties

mod client;
mod error;
mod properties;
mod types;

pub use client::NotionClient;
pub use error::NotionError;
pub use properties::{PropertyMode, cover_url, map_to_properties, retiring_date_patch};
pub use types::TrackedRow;
