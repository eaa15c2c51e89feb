//! Shared test utilities for orchestrator and polling tests
//!
//! `MockExchange` and `MockSwap` are scripted in-memory implementations of
//! the service traits that record every mutating call.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::adapters::clock::{Clock, ManualClock};
use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::traits::{CustodialExchange, SwapService};
use crate::adapters::types::{
    Account, Coin, DepositAddress, MarketOrder, OrderResult, PairLimits, Permissions,
    ProductLimits, Quote, SendFunds, Shift, Transaction,
};
use crate::core::poll;

/// Fixed "now" used by mock clocks: 2024-01-01T00:00:00Z
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub fn test_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::at(test_now()))
}

// =============================================================================
// Mock Exchange
// =============================================================================

/// Scripted custodial exchange
pub struct MockExchange {
    accounts: Mutex<HashMap<String, Account>>,
    products: Mutex<HashMap<String, ProductLimits>>,
    addresses: Mutex<HashMap<String, Vec<DepositAddress>>>,
    /// Base currency and amount credited when an order succeeds
    fill: Mutex<Option<(String, Decimal)>>,
    reject_reason: Mutex<Option<String>>,
    /// Operation name that fails with `ConnectionFailed`
    fail_on: Mutex<Option<&'static str>>,
    pub orders: Mutex<Vec<MarketOrder>>,
    pub sends: Mutex<Vec<SendFunds>>,
    pub created_addresses: AtomicUsize,
    pub balance_reads: AtomicUsize,
}

impl MockExchange {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            products: Mutex::new(HashMap::new()),
            addresses: Mutex::new(HashMap::new()),
            fill: Mutex::new(None),
            reject_reason: Mutex::new(None),
            fail_on: Mutex::new(None),
            orders: Mutex::new(Vec::new()),
            sends: Mutex::new(Vec::new()),
            created_addresses: AtomicUsize::new(0),
            balance_reads: AtomicUsize::new(0),
        }
    }

    pub fn with_account(self, currency: &str, balance: Decimal) -> Self {
        self.accounts.lock().unwrap().insert(
            currency.to_string(),
            Account {
                id: format!("acc-{}", currency.to_lowercase()),
                currency: currency.to_string(),
                balance,
            },
        );
        self
    }

    pub fn with_product(self, limits: ProductLimits) -> Self {
        self.products
            .lock()
            .unwrap()
            .insert(limits.product_id.clone(), limits);
        self
    }

    pub fn with_address(self, currency: &str, address: &str) -> Self {
        self.addresses
            .lock()
            .unwrap()
            .entry(currency.to_string())
            .or_default()
            .push(DepositAddress {
                address: address.to_string(),
                currency: currency.to_string(),
                network: None,
            });
        self
    }

    /// Credit `amount` of `currency` whenever an order succeeds
    pub fn with_fill(self, currency: &str, amount: Decimal) -> Self {
        *self.fill.lock().unwrap() = Some((currency.to_string(), amount));
        self
    }

    pub fn rejecting_orders(self, reason: &str) -> Self {
        *self.reject_reason.lock().unwrap() = Some(reason.to_string());
        self
    }

    pub fn failing_on(self, operation: &'static str) -> Self {
        *self.fail_on.lock().unwrap() = Some(operation);
        self
    }

    pub fn order_count(&self) -> usize {
        self.orders.lock().unwrap().len()
    }

    pub fn send_count(&self) -> usize {
        self.sends.lock().unwrap().len()
    }

    fn check_failure(&self, operation: &'static str) -> ExchangeResult<()> {
        if *self.fail_on.lock().unwrap() == Some(operation) {
            return Err(ExchangeError::ConnectionFailed(format!("mock {} failure", operation)));
        }
        Ok(())
    }
}

impl Default for MockExchange {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CustodialExchange for MockExchange {
    async fn get_account(&self, currency: &str) -> ExchangeResult<Account> {
        self.check_failure("get_account")?;
        self.balance_reads.fetch_add(1, Ordering::SeqCst);
        self.accounts
            .lock()
            .unwrap()
            .get(currency)
            .cloned()
            .ok_or_else(|| ExchangeError::NotFound(format!("{} account", currency)))
    }

    async fn get_or_create_deposit_address(
        &self,
        currency: &str,
    ) -> ExchangeResult<DepositAddress> {
        self.check_failure("get_or_create_deposit_address")?;
        let mut addresses = self.addresses.lock().unwrap();
        let list = addresses.entry(currency.to_string()).or_default();
        if let Some(first) = list.first() {
            return Ok(first.clone());
        }
        let n = self.created_addresses.fetch_add(1, Ordering::SeqCst) + 1;
        let created = DepositAddress {
            address: format!("{}-created-{}", currency.to_lowercase(), n),
            currency: currency.to_string(),
            network: None,
        };
        list.push(created.clone());
        Ok(created)
    }

    async fn place_market_order(&self, order: &MarketOrder) -> ExchangeResult<OrderResult> {
        self.check_failure("place_market_order")?;
        self.orders.lock().unwrap().push(order.clone());

        if let Some(reason) = self.reject_reason.lock().unwrap().clone() {
            return Ok(OrderResult {
                success: false,
                order_id: None,
                client_order_id: order.client_order_id.clone(),
                failure_reason: Some(reason),
            });
        }

        if let Some((currency, amount)) = self.fill.lock().unwrap().clone() {
            let mut accounts = self.accounts.lock().unwrap();
            let account = accounts.entry(currency.clone()).or_insert_with(|| Account {
                id: format!("acc-{}", currency.to_lowercase()),
                currency: currency.clone(),
                balance: Decimal::ZERO,
            });
            account.balance += amount;
        }

        Ok(OrderResult {
            success: true,
            order_id: Some(format!("order-{}", self.order_count())),
            client_order_id: order.client_order_id.clone(),
            failure_reason: None,
        })
    }

    async fn send_funds(&self, request: &SendFunds) -> ExchangeResult<Transaction> {
        self.check_failure("send_funds")?;
        self.sends.lock().unwrap().push(request.clone());
        Ok(Transaction {
            id: format!("tx-{}", self.send_count()),
            status: "pending".to_string(),
            amount: request.amount,
            currency: request.currency.clone(),
            network_hash: None,
        })
    }

    async fn get_product_limits(&self, product_id: &str) -> ExchangeResult<ProductLimits> {
        self.check_failure("get_product_limits")?;
        self.products
            .lock()
            .unwrap()
            .get(product_id)
            .cloned()
            .ok_or_else(|| ExchangeError::NotFound(format!("product {}", product_id)))
    }

    fn exchange_name(&self) -> &'static str {
        "mock-exchange"
    }
}

// =============================================================================
// Mock Swap Service
// =============================================================================

/// Scripted swap service
///
/// `get_shift` pops the next scripted status; the last one repeats.
pub struct MockSwap {
    pub permissions: Permissions,
    pub pair: PairLimits,
    pub quote_expires_at: DateTime<Utc>,
    pub shift_expires_at: DateTime<Utc>,
    statuses: Mutex<VecDeque<String>>,
    clock: Arc<dyn Clock>,
    pub quotes: Mutex<Vec<Decimal>>,
    /// (quote_id, settle_address, refund_address)
    pub shifts: Mutex<Vec<(String, String, String)>>,
    pub get_shift_calls: AtomicUsize,
    pub pair_calls: AtomicUsize,
}

impl MockSwap {
    pub fn new(min: Decimal, max: Decimal, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();
        Self {
            permissions: Permissions { create_shift: true },
            pair: PairLimits {
                min,
                max,
                rate: None,
                deposit_coin: None,
                settle_coin: None,
            },
            quote_expires_at: now + chrono::Duration::minutes(15),
            shift_expires_at: now + chrono::Duration::minutes(15),
            statuses: Mutex::new(VecDeque::from(vec!["settled".to_string()])),
            clock,
            quotes: Mutex::new(Vec::new()),
            shifts: Mutex::new(Vec::new()),
            get_shift_calls: AtomicUsize::new(0),
            pair_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_statuses(self, statuses: &[&str]) -> Self {
        *self.statuses.lock().unwrap() = statuses.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn shift_count(&self) -> usize {
        self.shifts.lock().unwrap().len()
    }

    pub fn get_shift_count(&self) -> usize {
        self.get_shift_calls.load(Ordering::SeqCst)
    }

    fn shift_record(&self, status: &str) -> Shift {
        let (quote_id, settle_address, refund_address) = self
            .shifts
            .lock()
            .unwrap()
            .last()
            .cloned()
            .unwrap_or_default();
        Shift {
            id: "shift-1".to_string(),
            created_at: Some(self.clock.now()),
            deposit_coin: "LTC".to_string(),
            settle_coin: "XMR".to_string(),
            deposit_network: None,
            settle_network: None,
            deposit_address: "ltc1qshiftdeposit".to_string(),
            settle_address,
            refund_address: Some(refund_address),
            kind: Some("fixed".to_string()),
            quote_id: Some(quote_id),
            deposit_min: None,
            deposit_max: None,
            deposit_amount: self.quotes.lock().unwrap().last().copied(),
            settle_amount: None,
            rate: None,
            expires_at: self.shift_expires_at,
            status: status.to_string(),
            updated_at: None,
            deposit_hash: None,
            settle_hash: None,
        }
    }
}

#[async_trait]
impl SwapService for MockSwap {
    async fn permissions(&self) -> ExchangeResult<Permissions> {
        Ok(self.permissions)
    }

    async fn get_pair_limits(&self, _deposit: &Coin, _settle: &Coin) -> ExchangeResult<PairLimits> {
        self.pair_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.pair.clone())
    }

    async fn create_quote(
        &self,
        deposit: &Coin,
        settle: &Coin,
        deposit_amount: Decimal,
    ) -> ExchangeResult<Quote> {
        self.quotes.lock().unwrap().push(deposit_amount);
        Ok(Quote {
            id: format!("quote-{}", self.quotes.lock().unwrap().len()),
            created_at: Some(self.clock.now()),
            deposit_coin: deposit.coin.to_uppercase(),
            settle_coin: settle.coin.to_uppercase(),
            deposit_network: deposit.network.clone(),
            settle_network: settle.network.clone(),
            expires_at: self.quote_expires_at,
            deposit_amount,
            settle_amount: deposit_amount / Decimal::from(2),
            rate: Decimal::new(5, 1),
        })
    }

    async fn create_fixed_shift(
        &self,
        quote_id: &str,
        settle_address: &str,
        refund_address: &str,
    ) -> ExchangeResult<Shift> {
        self.shifts.lock().unwrap().push((
            quote_id.to_string(),
            settle_address.to_string(),
            refund_address.to_string(),
        ));
        Ok(self.shift_record("waiting"))
    }

    async fn get_shift(&self, _shift_id: &str) -> ExchangeResult<Shift> {
        self.get_shift_calls.fetch_add(1, Ordering::SeqCst);
        let status = {
            let mut statuses = self.statuses.lock().unwrap();
            if statuses.len() > 1 {
                statuses.pop_front().unwrap_or_default()
            } else {
                statuses.front().cloned().unwrap_or_default()
            }
        };
        Ok(self.shift_record(&status))
    }

    async fn poll_shift(&self, shift_id: &str) -> ExchangeResult<Shift> {
        poll::poll_shift(self, shift_id, Duration::ZERO, self.clock.as_ref()).await
    }

    fn service_name(&self) -> &'static str {
        "mock-swap"
    }
}
