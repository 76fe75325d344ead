//! Header-driven quota guard for the challenge-platform API.

use std::time::Duration;

use crate::http::{HttpHeaders, header_get};

/// Remaining-quota threshold below which the guard pauses.
pub const QUOTA_LOW_WATER: u32 = 3;

/// Fixed pause applied when the remaining quota drops below the low-water
/// mark.
pub const QUOTA_PAUSE: Duration = Duration::from_secs(55);

/// Fixed-pause rate limit guard driven by response headers.
///
/// After every platform call the caller hands the response headers to
/// [`QuotaGuard::pace`]. When the remaining-quota header drops below the
/// low-water mark, the guard sleeps for a fixed duration before returning
/// control. No adaptive backoff, no jitter, no reset tracking: per-run call
/// volume is small enough that a blunt pause keeps the client inside its
/// quota.
#[derive(Debug, Clone)]
pub struct QuotaGuard {
    low_water: u32,
    pause: Duration,
}

impl QuotaGuard {
    pub fn new(low_water: u32, pause: Duration) -> Self {
        Self { low_water, pause }
    }

    /// Parse the remaining-quota header, if present and numeric.
    #[must_use]
    pub fn remaining(headers: &HttpHeaders) -> Option<u32> {
        header_get(headers, "x-ratelimit-remaining")?.parse().ok()
    }

    /// Whether these response headers require a pause.
    #[must_use]
    pub fn needs_pause(&self, headers: &HttpHeaders) -> bool {
        Self::remaining(headers).is_some_and(|remaining| remaining < self.low_water)
    }

    /// Inspect response headers and sleep if the quota is nearly exhausted.
    pub async fn pace(&self, headers: &HttpHeaders) {
        if let Some(remaining) = Self::remaining(headers)
            && remaining < self.low_water
        {
            tracing::info!(
                remaining,
                pause_secs = self.pause.as_secs(),
                "Quota nearly exhausted, pausing"
            );
            tokio::time::sleep(self.pause).await;
        }
    }
}

impl Default for QuotaGuard {
    fn default() -> Self {
        Self::new(QUOTA_LOW_WATER, QUOTA_PAUSE)
    }
}
