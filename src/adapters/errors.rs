//! Exchange adapter error types
//!
//! Every failure of an external-service call is reported as an
//! `ExchangeError`. Variants stay distinguishable so callers can tell a
//! transport problem from a rejected signature or an undecodable body.

use thiserror::Error;

/// Error types for signed requests and the typed clients built on them
#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Connection to the service failed (DNS, TLS, refused, reset)
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Network operation timed out
    #[error("Network timeout after {0}ms")]
    NetworkTimeout(u64),

    /// Credentials, signature or timestamp were rejected
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Non-2xx status carrying a service-specific error message
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Non-2xx status without a decodable error message
    #[error("Bad status code {0}")]
    BadStatus(u16),

    /// Invalid or unexpected response body
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Request could not be built (bad path, unserializable body)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Requested account, currency or product does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Shift reported a status outside the known lifecycle
    #[error("Unknown shift status: {0}")]
    UnknownStatus(String),
}

/// Result type alias for exchange operations
pub type ExchangeResult<T> = std::result::Result<T, ExchangeError>;
