//! Service client trait definitions
//!
//! `CustodialExchange` and `SwapService` are the two seams the conversion
//! orchestrator depends on. Concrete clients (Coinbase, SideShift) and the
//! scripted mocks in `test_utils` implement them.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::adapters::errors::ExchangeResult;
use crate::adapters::types::{
    Account, Coin, DepositAddress, MarketOrder, OrderResult, PairLimits, Permissions,
    ProductLimits, Quote, SendFunds, Shift, Transaction,
};

/// Typed operations against a custodial exchange account
///
/// Every method is a single signed request (or a short fixed sequence of
/// them). Nothing is cached: balances are re-read on every call.
#[async_trait]
pub trait CustodialExchange: Send + Sync {
    /// Fetch the account holding `currency`
    ///
    /// Fails with `NotFound` if the exchange has no such account.
    async fn get_account(&self, currency: &str) -> ExchangeResult<Account>;

    /// Available balance for `currency`
    async fn get_balance(&self, currency: &str) -> ExchangeResult<Decimal> {
        Ok(self.get_account(currency).await?.balance)
    }

    /// First existing deposit address for `currency`, creating one only if
    /// the account has none
    async fn get_or_create_deposit_address(&self, currency: &str)
        -> ExchangeResult<DepositAddress>;

    /// Place a market order sized in quote currency
    ///
    /// A rejected order is `Ok` with `success == false` and the exchange's
    /// reason; only transport/auth/decoding failures are `Err`.
    async fn place_market_order(&self, order: &MarketOrder) -> ExchangeResult<OrderResult>;

    /// Irreversible withdrawal to an external address
    async fn send_funds(&self, request: &SendFunds) -> ExchangeResult<Transaction>;

    /// Price and order-size limits for a product
    async fn get_product_limits(&self, product_id: &str) -> ExchangeResult<ProductLimits>;

    /// Get the exchange name
    fn exchange_name(&self) -> &'static str;
}

/// Typed operations against a non-custodial swap service
#[async_trait]
pub trait SwapService: Send + Sync {
    /// What the authenticated account is allowed to do
    async fn permissions(&self) -> ExchangeResult<Permissions>;

    /// Deposit limits for converting `deposit` into `settle`
    async fn get_pair_limits(&self, deposit: &Coin, settle: &Coin) -> ExchangeResult<PairLimits>;

    /// Fixed-rate quote for `deposit_amount` of `deposit`
    async fn create_quote(
        &self,
        deposit: &Coin,
        settle: &Coin,
        deposit_amount: Decimal,
    ) -> ExchangeResult<Quote>;

    /// Bind a quote to destination and refund addresses
    async fn create_fixed_shift(
        &self,
        quote_id: &str,
        settle_address: &str,
        refund_address: &str,
    ) -> ExchangeResult<Shift>;

    /// Single fetch of a shift
    async fn get_shift(&self, shift_id: &str) -> ExchangeResult<Shift>;

    /// Poll until the shift is terminal or its expiry passes
    async fn poll_shift(&self, shift_id: &str) -> ExchangeResult<Shift>;

    /// Get the service name
    fn service_name(&self) -> &'static str;
}
