//! Error types for challenge-platform API operations.

use thiserror::Error;

/// Errors that can occur when talking to the challenge platform.
///
/// Every variant is fatal to the run: the engine propagates them unchanged
/// and the caller decides how to report and exit.
#[derive(Debug, Error)]
pub enum HtbError {
    /// HTTP transport failed before a response was produced.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response body failed to parse.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The platform returned a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// Get a short error message suitable for progress display.
pub fn short_error_message(err: &HtbError) -> String {
    match err {
        HtbError::Http(_) => "Network error".to_string(),
        HtbError::Json(_) => "JSON parse error".to_string(),
        HtbError::Api { status, message } => {
            if message.len() > 50 {
                let truncated: String = message.chars().take(47).collect();
                format!("HTTP {}: {}...", status, truncated)
            } else {
                format!("HTTP {}: {}", status, message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_message_truncates_long_bodies() {
        let err = HtbError::Api {
            status: 500,
            message: "x".repeat(200),
        };
        let msg = short_error_message(&err);
        assert!(msg.starts_with("HTTP 500: "));
        assert!(msg.ends_with("..."));
        assert!(msg.len() < 70);
    }

    #[test]
    fn short_message_keeps_short_bodies() {
        let err = HtbError::Api {
            status: 404,
            message: "not found".to_string(),
        };
        assert_eq!(short_error_message(&err), "HTTP 404: not found");
    }
}
