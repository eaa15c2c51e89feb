//! SideShift swap-service client

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use rust_decimal::Decimal;

use super::config::SideShiftConfig;
use super::signing::SideShiftSigner;
use super::types::{FixedShiftRequest, QuoteRequest, VariableShiftRequest};
use crate::adapters::clock::Clock;
use crate::adapters::errors::ExchangeResult;
use crate::adapters::rest::SignedClient;
use crate::adapters::shared::path_segment;
use crate::adapters::signing::RequestBody;
use crate::adapters::traits::SwapService;
use crate::adapters::types::{Coin, PairLimits, Permissions, Quote, Shift};
use crate::core::poll;

/// SideShift v2 client
pub struct SideShiftClient {
    rest: SignedClient<SideShiftSigner>,
    affiliate_id: Option<String>,
    poll_interval: Duration,
}

impl SideShiftClient {
    pub fn new(config: SideShiftConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            rest: SignedClient::new(config.base_url, SideShiftSigner::new(config.secret), clock),
            affiliate_id: config.affiliate_id,
            poll_interval: config.poll_interval,
        }
    }

    /// Build from `SIDESHIFT_*` environment variables
    pub fn from_env(clock: Arc<dyn Clock>) -> ExchangeResult<Self> {
        Ok(Self::new(SideShiftConfig::from_env()?, clock))
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Variable-rate shift: no quote, the rate is fixed when the deposit lands
    pub async fn create_variable_shift(
        &self,
        deposit: &Coin,
        settle: &Coin,
        settle_address: &str,
        refund_address: &str,
    ) -> ExchangeResult<Shift> {
        let request = VariableShiftRequest {
            settle_address,
            refund_address,
            deposit_coin: &deposit.coin,
            deposit_network: deposit.network.as_deref(),
            settle_coin: &settle.coin,
            settle_network: settle.network.as_deref(),
            affiliate_id: self.affiliate_id.as_deref(),
        };
        let shift: Shift = self
            .rest
            .send(Method::POST, "/shifts/variable", RequestBody::json(&request)?)
            .await?;
        tracing::info!(
            service = "sideshift",
            shift_id = %shift.id,
            deposit_address = %shift.deposit_address,
            deposit_min = ?shift.deposit_min,
            deposit_max = ?shift.deposit_max,
            "Variable shift created"
        );
        Ok(shift)
    }
}

#[async_trait]
impl SwapService for SideShiftClient {
    async fn permissions(&self) -> ExchangeResult<Permissions> {
        self.rest.send(Method::GET, "/permissions", RequestBody::Empty).await
    }

    async fn get_pair_limits(&self, deposit: &Coin, settle: &Coin) -> ExchangeResult<PairLimits> {
        let from = deposit.to_string();
        let to = settle.to_string();
        let path = format!("/pair/{}/{}", path_segment(&from)?, path_segment(&to)?);
        let limits: PairLimits = self.rest.send(Method::GET, &path, RequestBody::Empty).await?;
        tracing::debug!(
            service = "sideshift",
            pair = %format!("{}/{}", from, to),
            min = %limits.min,
            max = %limits.max,
            "Pair limits fetched"
        );
        Ok(limits)
    }

    async fn create_quote(
        &self,
        deposit: &Coin,
        settle: &Coin,
        deposit_amount: Decimal,
    ) -> ExchangeResult<Quote> {
        let request = QuoteRequest {
            deposit_coin: &deposit.coin,
            deposit_network: deposit.network.as_deref(),
            settle_coin: &settle.coin,
            settle_network: settle.network.as_deref(),
            deposit_amount: deposit_amount.normalize().to_string(),
            affiliate_id: self.affiliate_id.as_deref(),
        };
        let quote: Quote = self
            .rest
            .send(Method::POST, "/quotes", RequestBody::json(&request)?)
            .await?;
        tracing::info!(
            service = "sideshift",
            quote_id = %quote.id,
            deposit_amount = %quote.deposit_amount,
            settle_amount = %quote.settle_amount,
            rate = %quote.rate,
            expires_at = %quote.expires_at,
            "Quote created"
        );
        Ok(quote)
    }

    async fn create_fixed_shift(
        &self,
        quote_id: &str,
        settle_address: &str,
        refund_address: &str,
    ) -> ExchangeResult<Shift> {
        let request = FixedShiftRequest {
            settle_address,
            refund_address,
            quote_id,
            affiliate_id: self.affiliate_id.as_deref(),
        };
        let shift: Shift = self
            .rest
            .send(Method::POST, "/shifts/fixed", RequestBody::json(&request)?)
            .await?;
        tracing::info!(
            service = "sideshift",
            shift_id = %shift.id,
            deposit_address = %shift.deposit_address,
            expires_at = %shift.expires_at,
            "Fixed shift created"
        );
        Ok(shift)
    }

    async fn get_shift(&self, shift_id: &str) -> ExchangeResult<Shift> {
        let path = format!("/shifts/{}", path_segment(shift_id)?);
        self.rest.send(Method::GET, &path, RequestBody::Empty).await
    }

    async fn poll_shift(&self, shift_id: &str) -> ExchangeResult<Shift> {
        poll::poll_shift(self, shift_id, self.poll_interval, self.rest.clock().as_ref()).await
    }

    fn service_name(&self) -> &'static str {
        "sideshift"
    }
}
