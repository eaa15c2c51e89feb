//! Application-wide constants and configuration defaults
//!
//! Values can be overridden via environment variables.

use std::time::Duration;

// =============================================================================
// Swap Service
// =============================================================================

/// Delay between shift status polls (default: 10 seconds)
///
/// Environment variable: `SHIFT_POLL_INTERVAL_SECS`
pub fn shift_poll_interval() -> Duration {
    let secs = std::env::var("SHIFT_POLL_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);
    Duration::from_secs(secs)
}

// =============================================================================
// HTTP
// =============================================================================

/// Whole-request timeout for every service call (default: 10 seconds)
///
/// Environment variable: `HTTP_TIMEOUT_SECS`
pub fn http_timeout() -> Duration {
    let secs = std::env::var("HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|s: &u64| *s > 0)
        .unwrap_or(10);
    Duration::from_secs(secs)
}

/// Print all configuration values (for startup logs)
pub fn log_configuration() {
    tracing::info!(
        phase = "init",
        shift_poll_interval_s = shift_poll_interval().as_secs(),
        http_timeout_s = http_timeout().as_secs(),
        "Runtime configuration"
    );
}
