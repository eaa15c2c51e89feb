//! Coinbase Configuration
//!
//! API-key credentials and endpoint, loaded from the environment.

use secrecy::SecretString;
use url::Url;

use crate::adapters::errors::ExchangeResult;
use crate::adapters::shared::{base_url_from_env, required_env};

/// Production REST endpoint (v2 and v3 paths both hang off it)
pub const COINBASE_BASE_URL: &str = "https://api.coinbase.com";

/// API version pinned on every request
pub const COINBASE_API_VERSION: &str = "2022-11-28";

/// Configuration for the Coinbase account client
#[derive(Debug, Clone)]
pub struct CoinbaseConfig {
    pub api_key: String,
    pub api_secret: SecretString,
    pub base_url: Url,
}

impl CoinbaseConfig {
    pub fn new(api_key: impl Into<String>, api_secret: SecretString, base_url: Url) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret,
            base_url,
        }
    }

    /// Create configuration from environment variables
    ///
    /// `COINBASE_API_KEY` and `COINBASE_API_SECRET` are required;
    /// `COINBASE_BASE_URL` overrides the endpoint.
    pub fn from_env() -> ExchangeResult<Self> {
        let api_key = required_env("COINBASE_API_KEY")?;
        let api_secret = SecretString::from(required_env("COINBASE_API_SECRET")?);
        let base_url = base_url_from_env("COINBASE_BASE_URL", COINBASE_BASE_URL)?;
        Ok(Self::new(api_key, api_secret, base_url))
    }
}
