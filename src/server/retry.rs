//! Backoff for requests to the video server.

use std::time::Duration;

use reqwest::StatusCode;

/// Retries after the first attempt when the network fails.
pub const DEFAULT_NETWORK_RETRIES: u32 = 3;

pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_millis(500);

pub const DEFAULT_BACKOFF_MAX: Duration = Duration::from_secs(10);

/// How a client retries failed requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub base: Duration,
    pub max: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: DEFAULT_NETWORK_RETRIES,
            base: DEFAULT_BACKOFF_BASE,
            max: DEFAULT_BACKOFF_MAX,
        }
    }
}

impl RetryPolicy {
    /// Fail on the first error.
    pub fn none() -> Self {
        Self {
            retries: 0,
            ..Self::default()
        }
    }

    pub fn delay(&self, attempt: u32) -> Duration {
        calculate_backoff(attempt, self.base, self.max)
    }
}

/// Whether a request error is worth another attempt.
///
/// Connection failures, timeouts and broken bodies usually clear up; a
/// malformed URL or a TLS rejection does not.
pub fn is_transient_network_error(error: &reqwest::Error) -> bool {
    if error.is_connect() || error.is_timeout() || error.is_body() {
        return true;
    }
    error.status().is_some_and(is_transient_status)
}

/// Gateway errors the server or a proxy in front of it reports while restarting.
pub fn is_transient_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT
    )
}

/// Exponential backoff: `min(base * 2^attempt + base / 2, max)`.
pub fn calculate_backoff(attempt: u32, base: Duration, max: Duration) -> Duration {
    let exponential = base.saturating_mul(2u32.saturating_pow(attempt));
    let jitter = base / 2;
    exponential.saturating_add(jitter).min(max)
}
