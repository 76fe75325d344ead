//! Error types for tracker-database operations.

use thiserror::Error;

/// Errors that can occur when talking to the tracker database.
///
/// Queries and writes carry distinct variants because the caller reports
/// them differently: a failed query aborts before anything is mutated, a
/// failed write may leave earlier rows already changed.
#[derive(Debug, Error)]
pub enum NotionError {
    /// HTTP transport failed before a response was produced.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response body failed to parse.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The row query returned a non-success status.
    #[error("query failed ({status}): {message}")]
    Query { status: u16, message: String },

    /// A row create or patch returned a non-success status.
    #[error("write failed ({status}): {message}")]
    Write { status: u16, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_status_and_body() {
        let err = NotionError::Write {
            status: 400,
            message: "Status is expected to be select".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("400"));
        assert!(text.contains("select"));
    }
}
