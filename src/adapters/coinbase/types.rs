//! Coinbase API wire types
//!
//! v2 (accounts, addresses, transactions) responses are wrapped in
//! `{"data": ...}`; v3 brokerage responses are not.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::types::{DepositAddress, OrderResult, ProductLimits, Transaction};

// =============================================================================
// Envelopes
// =============================================================================

/// v2 success envelope
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct CoinbaseErrorItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body across v2 (`errors` array) and v3 (`error` + `message`)
#[derive(Debug, Deserialize)]
pub struct CoinbaseErrorBody {
    #[serde(default)]
    pub errors: Vec<CoinbaseErrorItem>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl CoinbaseErrorBody {
    pub fn into_message(self) -> Option<String> {
        let first = self
            .errors
            .into_iter()
            .find_map(|e| e.message.or(e.id));
        first
            .or(self.message)
            .or(self.error)
            .filter(|m| !m.is_empty())
    }
}

// =============================================================================
// v2: Accounts, Addresses, Transactions
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CoinbaseMoney {
    pub amount: Decimal,
    pub currency: String,
}

#[derive(Debug, Deserialize)]
pub struct CoinbaseCurrency {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct CoinbaseAccount {
    pub id: String,
    pub currency: CoinbaseCurrency,
    pub balance: CoinbaseMoney,
}

#[derive(Debug, Deserialize)]
pub struct CoinbaseAddress {
    pub id: String,
    pub address: String,
    #[serde(default)]
    pub network: Option<String>,
}

impl CoinbaseAddress {
    pub fn into_deposit_address(self, currency: &str) -> DepositAddress {
        DepositAddress {
            address: self.address,
            currency: currency.to_string(),
            network: self.network,
        }
    }
}

/// Body of `POST /v2/accounts/{id}/transactions`
#[derive(Debug, Serialize)]
pub struct SendRequest<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub to: &'a str,
    pub amount: String,
    pub currency: &'a str,
    /// Idempotency token; a replay with the same value is not re-executed
    pub idem: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct CoinbaseNetwork {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CoinbaseTransaction {
    pub id: String,
    pub status: String,
    pub amount: CoinbaseMoney,
    #[serde(default)]
    pub network: Option<CoinbaseNetwork>,
}

impl From<CoinbaseTransaction> for Transaction {
    fn from(tx: CoinbaseTransaction) -> Self {
        Transaction {
            id: tx.id,
            status: tx.status,
            // Sends are reported as negative amounts on the source account
            amount: tx.amount.amount.abs(),
            currency: tx.amount.currency,
            network_hash: tx.network.and_then(|n| n.hash),
        }
    }
}

// =============================================================================
// v3: Brokerage orders and products
// =============================================================================

#[derive(Debug, Serialize)]
pub struct MarketIoc {
    pub quote_size: String,
}

#[derive(Debug, Serialize)]
pub struct OrderConfiguration {
    pub market_market_ioc: MarketIoc,
}

/// Body of `POST /api/v3/brokerage/orders`
#[derive(Debug, Serialize)]
pub struct CreateOrderRequest<'a> {
    pub client_order_id: &'a str,
    pub product_id: &'a str,
    pub side: String,
    pub order_configuration: OrderConfiguration,
}

#[derive(Debug, Deserialize)]
pub struct OrderSuccess {
    pub order_id: String,
    #[serde(default)]
    pub client_order_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrderFailure {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error_details: Option<String>,
    #[serde(default)]
    pub preview_failure_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderResponse {
    pub success: bool,
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub success_response: Option<OrderSuccess>,
    #[serde(default)]
    pub error_response: Option<OrderFailure>,
}

impl CreateOrderResponse {
    pub fn into_order_result(self, client_order_id: &str) -> OrderResult {
        let failure_reason = if self.success {
            None
        } else {
            let detail = self.error_response.and_then(|e| {
                e.message
                    .or(e.error_details)
                    .or(e.preview_failure_reason)
                    .or(e.error)
            });
            detail
                .or(self.failure_reason)
                .or_else(|| Some("UNKNOWN_FAILURE_REASON".to_string()))
        };
        let success_response = self.success_response;
        OrderResult {
            success: self.success,
            order_id: success_response.as_ref().map(|s| s.order_id.clone()),
            client_order_id: success_response
                .and_then(|s| s.client_order_id)
                .unwrap_or_else(|| client_order_id.to_string()),
            failure_reason,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CoinbaseProduct {
    pub product_id: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub quote_min_size: String,
    #[serde(default)]
    pub quote_max_size: String,
    #[serde(default)]
    pub trading_disabled: bool,
}

impl CoinbaseProduct {
    pub fn into_limits(self) -> ExchangeResult<ProductLimits> {
        Ok(ProductLimits {
            price: parse_decimal("price", &self.price)?.unwrap_or(Decimal::ZERO),
            min_order_size: parse_decimal("quote_min_size", &self.quote_min_size)?
                .unwrap_or(Decimal::ZERO),
            // No published maximum means no cap on the order size
            max_order_size: parse_decimal("quote_max_size", &self.quote_max_size)?
                .unwrap_or(Decimal::MAX),
            trading_disabled: self.trading_disabled,
            product_id: self.product_id,
        })
    }
}

/// Brokerage decimals arrive as strings; an empty string means absent
fn parse_decimal(field: &str, raw: &str) -> ExchangeResult<Option<Decimal>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|e| ExchangeError::InvalidResponse(format!("Invalid {} '{}': {}", field, raw, e)))
}
