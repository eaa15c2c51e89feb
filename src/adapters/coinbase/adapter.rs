//! Coinbase account client
//!
//! Typed operations over `SignedClient<CoinbaseSigner>`: account lookup,
//! deposit-address resolution, brokerage market orders, product limits and
//! withdrawals.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;

use super::config::CoinbaseConfig;
use super::signing::CoinbaseSigner;
use super::types::{
    CoinbaseAccount, CoinbaseAddress, CoinbaseProduct, CoinbaseTransaction, CreateOrderRequest,
    CreateOrderResponse, DataEnvelope, MarketIoc, OrderConfiguration, SendRequest,
};
use crate::adapters::clock::Clock;
use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::rest::SignedClient;
use crate::adapters::shared::path_segment;
use crate::adapters::signing::RequestBody;
use crate::adapters::traits::CustodialExchange;
use crate::adapters::types::{
    Account, DepositAddress, MarketOrder, OrderResult, ProductLimits, SendFunds, Transaction,
};

/// Coinbase custodial account client
pub struct CoinbaseClient {
    rest: SignedClient<CoinbaseSigner>,
}

impl CoinbaseClient {
    pub fn new(config: CoinbaseConfig, clock: Arc<dyn Clock>) -> Self {
        let signer = CoinbaseSigner::new(config.api_key, config.api_secret);
        Self {
            rest: SignedClient::new(config.base_url, signer, clock),
        }
    }

    /// Build from `COINBASE_*` environment variables
    pub fn from_env(clock: Arc<dyn Clock>) -> ExchangeResult<Self> {
        Ok(Self::new(CoinbaseConfig::from_env()?, clock))
    }

    async fn list_addresses(&self, currency: &str) -> ExchangeResult<Vec<CoinbaseAddress>> {
        let path = format!("/v2/accounts/{}/addresses", path_segment(currency)?);
        let envelope: DataEnvelope<Vec<CoinbaseAddress>> =
            self.rest.send(Method::GET, &path, RequestBody::Empty).await?;
        Ok(envelope.data)
    }

    async fn create_address(&self, currency: &str) -> ExchangeResult<CoinbaseAddress> {
        let path = format!("/v2/accounts/{}/addresses", path_segment(currency)?);
        let envelope: DataEnvelope<CoinbaseAddress> =
            self.rest.send(Method::POST, &path, RequestBody::Empty).await?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl CustodialExchange for CoinbaseClient {
    async fn get_account(&self, currency: &str) -> ExchangeResult<Account> {
        let path = format!("/v2/accounts/{}", path_segment(currency)?);
        let envelope: DataEnvelope<CoinbaseAccount> = self
            .rest
            .send(Method::GET, &path, RequestBody::Empty)
            .await
            .map_err(|e| match e {
                ExchangeError::Api { status: 404, .. } | ExchangeError::BadStatus(404) => {
                    ExchangeError::NotFound(format!("{} account", currency))
                }
                other => other,
            })?;

        let account = envelope.data;
        tracing::debug!(
            exchange = "coinbase",
            currency = %account.currency.code,
            balance = %account.balance.amount,
            "Account fetched"
        );
        Ok(Account {
            id: account.id,
            currency: account.currency.code,
            balance: account.balance.amount,
        })
    }

    async fn get_or_create_deposit_address(
        &self,
        currency: &str,
    ) -> ExchangeResult<DepositAddress> {
        if let Some(existing) = self.list_addresses(currency).await?.into_iter().next() {
            tracing::debug!(
                exchange = "coinbase",
                currency = %currency,
                address = %existing.address,
                "Reusing existing deposit address"
            );
            return Ok(existing.into_deposit_address(currency));
        }

        let created = self.create_address(currency).await?;
        tracing::info!(
            exchange = "coinbase",
            currency = %currency,
            address = %created.address,
            "Created deposit address"
        );
        Ok(created.into_deposit_address(currency))
    }

    async fn place_market_order(&self, order: &MarketOrder) -> ExchangeResult<OrderResult> {
        let request = CreateOrderRequest {
            client_order_id: &order.client_order_id,
            product_id: &order.product_id,
            side: order.side.to_string(),
            order_configuration: OrderConfiguration {
                market_market_ioc: MarketIoc {
                    quote_size: order.quote_size.normalize().to_string(),
                },
            },
        };
        let response: CreateOrderResponse = self
            .rest
            .send(Method::POST, "/api/v3/brokerage/orders", RequestBody::json(&request)?)
            .await?;

        let result = response.into_order_result(&order.client_order_id);
        tracing::info!(
            exchange = "coinbase",
            product = %order.product_id,
            side = %order.side,
            quote_size = %order.quote_size,
            success = result.success,
            order_id = ?result.order_id,
            "Market order placed"
        );
        Ok(result)
    }

    async fn send_funds(&self, request: &SendFunds) -> ExchangeResult<Transaction> {
        let path = format!("/v2/accounts/{}/transactions", path_segment(&request.account_id)?);
        let body = SendRequest {
            kind: "send",
            to: &request.to,
            amount: request.amount.normalize().to_string(),
            currency: &request.currency,
            idem: &request.idempotency_token,
        };
        let envelope: DataEnvelope<CoinbaseTransaction> = self
            .rest
            .send(Method::POST, &path, RequestBody::json(&body)?)
            .await?;

        let tx: Transaction = envelope.data.into();
        tracing::info!(
            exchange = "coinbase",
            tx_id = %tx.id,
            status = %tx.status,
            amount = %tx.amount,
            currency = %tx.currency,
            "Withdrawal submitted"
        );
        Ok(tx)
    }

    async fn get_product_limits(&self, product_id: &str) -> ExchangeResult<ProductLimits> {
        let path = format!("/api/v3/brokerage/products/{}", path_segment(product_id)?);
        let product: CoinbaseProduct = self.rest.send(Method::GET, &path, RequestBody::Empty).await?;
        product.into_limits()
    }

    fn exchange_name(&self) -> &'static str {
        "coinbase"
    }
}
