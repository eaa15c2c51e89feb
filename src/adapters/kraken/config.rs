//! Kraken Configuration

use secrecy::SecretString;
use url::Url;

use crate::adapters::errors::ExchangeResult;
use crate::adapters::shared::{base_url_from_env, required_env};

pub const KRAKEN_BASE_URL: &str = "https://api.kraken.com";

/// Configuration for the Kraken private API client
#[derive(Debug, Clone)]
pub struct KrakenConfig {
    pub api_key: String,
    /// Base64-encoded private key as issued by Kraken
    pub api_secret: SecretString,
    pub base_url: Url,
}

impl KrakenConfig {
    pub fn new(api_key: impl Into<String>, api_secret: SecretString, base_url: Url) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret,
            base_url,
        }
    }

    /// Create configuration from `KRAKEN_API_KEY`, `KRAKEN_API_SECRET` and
    /// optional `KRAKEN_BASE_URL`
    pub fn from_env() -> ExchangeResult<Self> {
        let api_key = required_env("KRAKEN_API_KEY")?;
        let api_secret = SecretString::from(required_env("KRAKEN_API_SECRET")?);
        let base_url = base_url_from_env("KRAKEN_BASE_URL", KRAKEN_BASE_URL)?;
        Ok(Self::new(api_key, api_secret, base_url))
    }
}
