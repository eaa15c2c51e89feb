//! Logging configuration
//!
//! # Environment Variables
//! - `LOG_FORMAT`: Output format - `json` (default) or `pretty`
//! - `RUST_LOG`: Log level filter (default: `info`)

use tracing_subscriber::EnvFilter;

/// Subscriber output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Machine-parseable, one JSON object per event
    Json,
    /// Human-readable, multi-line
    Pretty,
}

impl LogFormat {
    /// Anything other than `pretty` falls back to JSON
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }

    pub fn from_env() -> Self {
        Self::parse(std::env::var("LOG_FORMAT").ok().as_deref())
    }
}

/// Initialize the global tracing subscriber
///
/// Must be called once, before any client is built.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match LogFormat::from_env() {
        LogFormat::Pretty => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .pretty()
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .json()
                .init();
        }
    }
}
