//! Core data types shared by the exchange and swap-service clients
//!
//! Amounts are `Decimal` throughout. Swap-service records (`PairLimits`,
//! `Quote`, `Shift`) deserialize straight from the SideShift wire format.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::adapters::errors::ExchangeError;

// =============================================================================
// HTTP Client Constants
// =============================================================================

/// HTTP connection timeout (milliseconds)
const HTTP_CONNECT_TIMEOUT_MS: u64 = 5_000;
/// Max idle connections per host in connection pool
const HTTP_POOL_MAX_IDLE: usize = 2;
/// How long idle connections stay in the pool (seconds)
const HTTP_POOL_IDLE_TIMEOUT_SECS: u64 = 60;
/// TCP keepalive interval (seconds)
const HTTP_TCP_KEEPALIVE_SECS: u64 = 30;

/// Create the pooled HTTP client used by a service client
pub fn create_http_client(service_name: &str, timeout: Duration) -> reqwest::Client {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(HTTP_POOL_MAX_IDLE)
        .pool_idle_timeout(Duration::from_secs(HTTP_POOL_IDLE_TIMEOUT_SECS))
        .tcp_keepalive(Duration::from_secs(HTTP_TCP_KEEPALIVE_SECS))
        .connect_timeout(Duration::from_millis(HTTP_CONNECT_TIMEOUT_MS))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new());
    tracing::info!(
        phase = "init",
        service = %service_name,
        timeout_s = timeout.as_secs(),
        connect_timeout_ms = HTTP_CONNECT_TIMEOUT_MS,
        pool_max_idle = HTTP_POOL_MAX_IDLE,
        "HTTP client configured"
    );
    client
}

// =============================================================================
// Custodial Exchange Types
// =============================================================================

/// A currency account held at the custodial exchange
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Exchange-assigned account id (used for withdrawals)
    pub id: String,
    /// Currency code, e.g. "GBP" or "LTC"
    pub currency: String,
    /// Available balance
    pub balance: Decimal,
}

/// A deposit address owned by the exchange account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositAddress {
    pub address: String,
    pub currency: String,
    pub network: Option<String>,
}

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

/// Market order sized in quote currency
#[derive(Debug, Clone, PartialEq)]
pub struct MarketOrder {
    /// Idempotency token, unique per attempt
    pub client_order_id: String,
    /// Product/pair, e.g. "LTC-GBP"
    pub product_id: String,
    pub side: OrderSide,
    /// Amount of quote currency to spend
    pub quote_size: Decimal,
}

impl MarketOrder {
    /// Market buy with a freshly generated idempotency token
    pub fn buy(product_id: impl Into<String>, quote_size: Decimal) -> Self {
        Self {
            client_order_id: uuid::Uuid::new_v4().to_string(),
            product_id: product_id.into(),
            side: OrderSide::Buy,
            quote_size,
        }
    }
}

/// Outcome of an order placement
#[derive(Debug, Clone, PartialEq)]
pub struct OrderResult {
    pub success: bool,
    pub order_id: Option<String>,
    pub client_order_id: String,
    /// Structured reason reported by the exchange when `success` is false
    pub failure_reason: Option<String>,
}

/// Trading limits for a product, in quote currency
#[derive(Debug, Clone, PartialEq)]
pub struct ProductLimits {
    pub product_id: String,
    /// Last price (quote per base)
    pub price: Decimal,
    pub min_order_size: Decimal,
    pub max_order_size: Decimal,
    pub trading_disabled: bool,
}

/// Irreversible withdrawal request
#[derive(Debug, Clone, PartialEq)]
pub struct SendFunds {
    pub account_id: String,
    pub to: String,
    pub amount: Decimal,
    pub currency: String,
    pub idempotency_token: String,
}

/// Result of a withdrawal
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub status: String,
    pub amount: Decimal,
    pub currency: String,
    pub network_hash: Option<String>,
}

// =============================================================================
// Swap Service Types
// =============================================================================

/// Shift permissions of the swap-service account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    pub create_shift: bool,
}

/// A coin with an optional network qualifier (e.g. "usdt" on "ethereum")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coin {
    pub coin: String,
    pub network: Option<String>,
}

impl Coin {
    pub fn new(coin: impl Into<String>) -> Self {
        Self {
            coin: coin.into(),
            network: None,
        }
    }

    pub fn on_network(coin: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            coin: coin.into(),
            network: Some(network.into()),
        }
    }
}

impl fmt::Display for Coin {
    /// Path form used by the pair endpoint: `coin` or `coin-network`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.network {
            Some(network) => write!(f, "{}-{}", self.coin, network),
            None => write!(f, "{}", self.coin),
        }
    }
}

/// Deposit limits and indicative rate for a coin pair
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairLimits {
    pub min: Decimal,
    pub max: Decimal,
    #[serde(default)]
    pub rate: Option<Decimal>,
    #[serde(default)]
    pub deposit_coin: Option<String>,
    #[serde(default)]
    pub settle_coin: Option<String>,
}

impl PairLimits {
    /// Inclusive range check
    pub fn contains(&self, amount: Decimal) -> bool {
        amount >= self.min && amount <= self.max
    }
}

/// Time-bounded price commitment
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    pub deposit_coin: String,
    pub settle_coin: String,
    #[serde(default)]
    pub deposit_network: Option<String>,
    #[serde(default)]
    pub settle_network: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub deposit_amount: Decimal,
    pub settle_amount: Decimal,
    pub rate: Decimal,
}

impl Quote {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Swap-service conversion record
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    pub deposit_coin: String,
    pub settle_coin: String,
    #[serde(default)]
    pub deposit_network: Option<String>,
    #[serde(default)]
    pub settle_network: Option<String>,
    pub deposit_address: String,
    pub settle_address: String,
    #[serde(default)]
    pub refund_address: Option<String>,
    /// "fixed" or "variable"
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub quote_id: Option<String>,
    #[serde(default)]
    pub deposit_min: Option<Decimal>,
    #[serde(default)]
    pub deposit_max: Option<Decimal>,
    #[serde(default)]
    pub deposit_amount: Option<Decimal>,
    #[serde(default)]
    pub settle_amount: Option<Decimal>,
    #[serde(default)]
    pub rate: Option<Decimal>,
    pub expires_at: DateTime<Utc>,
    /// Raw status as reported; see `Shift::status()`
    pub status: String,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deposit_hash: Option<String>,
    #[serde(default)]
    pub settle_hash: Option<String>,
}

impl Shift {
    /// Parse the reported status; unknown values are an error
    pub fn status(&self) -> Result<ShiftStatus, ExchangeError> {
        self.status.parse()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Shift lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftStatus {
    Waiting,
    Pending,
    Processing,
    Settling,
    Settled,
    Refund,
    Refunding,
    Refunded,
    /// Held for manual intervention
    Review,
    /// Variable shift received more than one deposit
    Multiple,
}

impl ShiftStatus {
    /// Polling stops on these
    pub fn is_terminal(self) -> bool {
        !matches!(
            self,
            ShiftStatus::Waiting
                | ShiftStatus::Pending
                | ShiftStatus::Processing
                | ShiftStatus::Settling
        )
    }

    /// Funds are being (or have been) returned to the refund address
    pub fn is_refund(self) -> bool {
        matches!(
            self,
            ShiftStatus::Refund | ShiftStatus::Refunding | ShiftStatus::Refunded
        )
    }

    /// Terminal, but needs a human before anything else happens
    pub fn needs_intervention(self) -> bool {
        matches!(self, ShiftStatus::Review | ShiftStatus::Multiple)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShiftStatus::Waiting => "waiting",
            ShiftStatus::Pending => "pending",
            ShiftStatus::Processing => "processing",
            ShiftStatus::Settling => "settling",
            ShiftStatus::Settled => "settled",
            ShiftStatus::Refund => "refund",
            ShiftStatus::Refunding => "refunding",
            ShiftStatus::Refunded => "refunded",
            ShiftStatus::Review => "review",
            ShiftStatus::Multiple => "multiple",
        }
    }
}

impl fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShiftStatus {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(ShiftStatus::Waiting),
            "pending" => Ok(ShiftStatus::Pending),
            "processing" => Ok(ShiftStatus::Processing),
            "settling" => Ok(ShiftStatus::Settling),
            "settled" => Ok(ShiftStatus::Settled),
            "refund" => Ok(ShiftStatus::Refund),
            "refunding" => Ok(ShiftStatus::Refunding),
            "refunded" => Ok(ShiftStatus::Refunded),
            "review" => Ok(ShiftStatus::Review),
            "multiple" => Ok(ShiftStatus::Multiple),
            other => Err(ExchangeError::UnknownStatus(other.to_string())),
        }
    }
}
