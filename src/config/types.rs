//! Configuration types for conversion settings
//!
//! Credentials never live here; they come from the environment through each
//! service's `*Config::from_env()`.

use serde::{Deserialize, Serialize};

use crate::adapters::types::Coin;
use crate::core::ConversionRequest;
use crate::error::AppError;

// ============================================================================
// Configuration Structs
// ============================================================================

/// What to convert and where to deliver it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Fiat currency held at the exchange (e.g., "GBP")
    pub fiat_currency: String,
    /// Coin bought on the exchange and deposited into the shift (e.g., "ltc")
    pub deposit_coin: String,
    #[serde(default)]
    pub deposit_network: Option<String>,
    /// Coin delivered to `settle_address` (e.g., "xmr")
    pub settle_coin: String,
    #[serde(default)]
    pub settle_network: Option<String>,
    /// Destination wallet address
    pub settle_address: String,
}

impl ConversionConfig {
    /// Validate conversion configuration rules
    pub fn validate(&self) -> Result<(), AppError> {
        for (field, value) in [
            ("fiat_currency", &self.fiat_currency),
            ("deposit_coin", &self.deposit_coin),
            ("settle_coin", &self.settle_coin),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Config(format!("{} cannot be empty", field)));
            }
            if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(AppError::Config(format!(
                    "{} must be an alphanumeric currency code (got '{}')",
                    field, value
                )));
            }
        }

        if self.settle_address.trim().is_empty() {
            return Err(AppError::Config("settle_address cannot be empty".to_string()));
        }

        if self.fiat_currency.eq_ignore_ascii_case(&self.deposit_coin) {
            return Err(AppError::Config(
                "fiat_currency and deposit_coin cannot be the same".to_string(),
            ));
        }

        if self.deposit_coin.eq_ignore_ascii_case(&self.settle_coin)
            && self.deposit_network == self.settle_network
        {
            return Err(AppError::Config(
                "deposit_coin and settle_coin cannot be the same".to_string(),
            ));
        }

        Ok(())
    }

    pub fn deposit(&self) -> Coin {
        Coin {
            coin: self.deposit_coin.to_ascii_lowercase(),
            network: self.deposit_network.clone(),
        }
    }

    pub fn settle(&self) -> Coin {
        Coin {
            coin: self.settle_coin.to_ascii_lowercase(),
            network: self.settle_network.clone(),
        }
    }

    /// Orchestrator input for this configuration
    pub fn to_request(&self) -> ConversionRequest {
        ConversionRequest {
            fiat_currency: self.fiat_currency.to_ascii_uppercase(),
            deposit: self.deposit(),
            settle: self.settle(),
            settle_address: self.settle_address.trim().to_string(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub conversion: ConversionConfig,
}

impl AppConfig {
    /// Validate all configuration rules
    pub fn validate(&self) -> Result<(), AppError> {
        self.conversion.validate()
    }
}
