use url::Url;

use crate::adapters::errors::{ExchangeError, ExchangeResult};

/// Read a credential that must be present and non-empty
pub fn required_env(name: &str) -> ExchangeResult<String> {
    let value = std::env::var(name)
        .map_err(|_| ExchangeError::AuthenticationFailed(format!("{} not set", name)))?;
    if value.trim().is_empty() {
        return Err(ExchangeError::AuthenticationFailed(format!("{} is empty", name)));
    }
    Ok(value)
}

/// Read an optional setting; empty counts as unset
pub fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Endpoint override from `name`, falling back to `default`
pub fn base_url_from_env(name: &str, default: &str) -> ExchangeResult<Url> {
    let raw = optional_env(name).unwrap_or_else(|| default.to_string());
    Url::parse(&raw)
        .map_err(|e| ExchangeError::InvalidRequest(format!("{} is not a valid URL ({}): {}", name, raw, e)))
}

/// Validate a value interpolated into a URL path
///
/// Ids and currency codes must not smuggle extra path segments or a query.
pub fn path_segment(value: &str) -> ExchangeResult<&str> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid && value != "." && value != ".." {
        Ok(value)
    } else {
        Err(ExchangeError::InvalidRequest(format!(
            "Invalid path segment '{}'",
            value
        )))
    }
}
