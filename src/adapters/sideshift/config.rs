//! SideShift Configuration

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::adapters::errors::ExchangeResult;
use crate::adapters::shared::{base_url_from_env, optional_env, required_env};
use crate::config::constants;

pub const SIDESHIFT_BASE_URL: &str = "https://sideshift.ai/api/v2";

/// Configuration for the SideShift client
#[derive(Debug, Clone)]
pub struct SideShiftConfig {
    /// Account secret sent as `x-sideshift-secret`
    pub secret: SecretString,
    /// Attached to quote and shift requests when set
    pub affiliate_id: Option<String>,
    pub base_url: Url,
    /// Delay between `GET /shifts/{id}` calls while polling
    pub poll_interval: Duration,
}

impl SideShiftConfig {
    pub fn new(secret: SecretString, base_url: Url) -> Self {
        Self {
            secret,
            affiliate_id: None,
            base_url,
            poll_interval: constants::shift_poll_interval(),
        }
    }

    pub fn with_affiliate_id(mut self, affiliate_id: impl Into<String>) -> Self {
        self.affiliate_id = Some(affiliate_id.into());
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Create configuration from `SIDESHIFT_SECRET`, optional
    /// `SIDESHIFT_AFFILIATE_ID` and optional `SIDESHIFT_BASE_URL`
    pub fn from_env() -> ExchangeResult<Self> {
        let secret = SecretString::from(required_env("SIDESHIFT_SECRET")?);
        let base_url = base_url_from_env("SIDESHIFT_BASE_URL", SIDESHIFT_BASE_URL)?;
        let mut config = Self::new(secret, base_url);
        config.affiliate_id = optional_env("SIDESHIFT_AFFILIATE_ID");
        Ok(config)
    }
}
