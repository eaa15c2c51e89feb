//! Kraken private API client
//!
//! Balance lookup and market orders over the form-encoded, nonce-signed
//! private endpoints.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Method;
use rust_decimal::Decimal;

use super::config::KrakenConfig;
use super::signing::KrakenSigner;
use super::types::{KrakenAddOrderResult, KrakenEnvelope, KrakenMarketOrder};
use crate::adapters::clock::Clock;
use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::rest::SignedClient;
use crate::adapters::signing::RequestBody;

const BALANCE_PATH: &str = "/0/private/Balance";
const ADD_ORDER_PATH: &str = "/0/private/AddOrder";

/// Kraken private API client
pub struct KrakenClient {
    rest: SignedClient<KrakenSigner>,
}

impl KrakenClient {
    pub fn new(config: KrakenConfig, clock: Arc<dyn Clock>) -> ExchangeResult<Self> {
        let signer = KrakenSigner::new(config.api_key, &config.api_secret)?;
        Ok(Self {
            rest: SignedClient::new(config.base_url, signer, clock),
        })
    }

    /// Build from `KRAKEN_*` environment variables
    pub fn from_env(clock: Arc<dyn Clock>) -> ExchangeResult<Self> {
        Self::new(KrakenConfig::from_env()?, clock)
    }

    /// All non-zero balances keyed by Kraken asset code (e.g. "ZGBP", "XLTC")
    pub async fn get_balances(&self) -> ExchangeResult<HashMap<String, Decimal>> {
        let envelope: KrakenEnvelope<HashMap<String, Decimal>> = self
            .rest
            .send(Method::POST, BALANCE_PATH, RequestBody::Empty)
            .await?;
        envelope.into_result()
    }

    /// Balance of one asset; Kraken omits assets the account never held
    pub async fn get_balance(&self, asset: &str) -> ExchangeResult<Decimal> {
        self.get_balances()
            .await?
            .remove(asset)
            .ok_or_else(|| ExchangeError::NotFound(format!("{} balance", asset)))
    }

    /// Submit (or, with `validate`, dry-run) a market order
    pub async fn add_market_order(
        &self,
        order: &KrakenMarketOrder,
    ) -> ExchangeResult<KrakenAddOrderResult> {
        let envelope: KrakenEnvelope<KrakenAddOrderResult> = self
            .rest
            .send(Method::POST, ADD_ORDER_PATH, RequestBody::Form(order.form_fields()))
            .await?;
        let result = envelope.into_result()?;

        tracing::info!(
            exchange = "kraken",
            pair = %order.pair,
            side = %order.side,
            volume = %order.volume,
            validate = order.validate,
            txids = ?result.txid,
            description = %result.descr.order,
            "Market order submitted"
        );
        Ok(result)
    }
}
