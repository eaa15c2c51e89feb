//! Conversion orchestrator
//!
//! Drives one fiat -> crypto conversion end to end:
//!
//! 0. check the swap account may create shifts
//! 1. if there is fiat, buy the deposit coin (size clamped to the product
//!    maximum, with a preflight estimate against the shift minimum)
//! 2. re-read the deposit-coin balance and check it against fresh pair limits
//! 3. resolve a refund address on the exchange
//! 4. quote the whole balance and bind it to a fixed shift
//! 5. withdraw the whole balance to the shift's deposit address
//! 6. poll the shift to a terminal status
//!
//! Steps run strictly in order and the first failure aborts the rest. The
//! withdrawal is the last mutating call and only happens after every check.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::adapters::clock::Clock;
use crate::adapters::traits::{CustodialExchange, SwapService};
use crate::adapters::types::{
    Coin, MarketOrder, OrderResult, Quote, SendFunds, Shift, ShiftStatus, Transaction,
};
use crate::error::{ConvertError, ConvertStep, StepContext};

/// Orchestrator input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    /// Fiat currency code at the exchange, e.g. "GBP"
    pub fiat_currency: String,
    /// Coin bought on the exchange and deposited into the shift
    pub deposit: Coin,
    /// Coin delivered to `settle_address`
    pub settle: Coin,
    pub settle_address: String,
}

impl ConversionRequest {
    /// Exchange currency code of the deposit coin, e.g. "LTC"
    pub fn base_currency(&self) -> String {
        self.deposit.coin.to_ascii_uppercase()
    }

    /// Exchange product used for the fiat purchase, e.g. "LTC-GBP"
    pub fn product_id(&self) -> String {
        format!("{}-{}", self.base_currency(), self.fiat_currency.to_ascii_uppercase())
    }
}

/// Everything a finished conversion produced
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    /// `None` when there was no fiat to spend
    pub order: Option<OrderResult>,
    pub quote: Quote,
    /// Last-known shift record after polling
    pub shift: Shift,
    pub transaction: Transaction,
}

impl ConversionOutcome {
    pub fn status(&self) -> Option<ShiftStatus> {
        self.shift.status().ok()
    }

    pub fn is_settled(&self) -> bool {
        self.status() == Some(ShiftStatus::Settled)
    }
}

/// Order size in quote currency: the whole fiat balance, capped at the
/// product maximum
pub fn clamp_order_size(balance: Decimal, max_order_size: Decimal) -> Decimal {
    balance.min(max_order_size)
}

/// Composes an exchange and a swap service into the conversion workflow
pub struct Converter<E, S> {
    exchange: E,
    swap: S,
    clock: Arc<dyn Clock>,
}

impl<E: CustodialExchange, S: SwapService> Converter<E, S> {
    pub fn new(exchange: E, swap: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            exchange,
            swap,
            clock,
        }
    }

    pub fn exchange(&self) -> &E {
        &self.exchange
    }

    pub fn swap(&self) -> &S {
        &self.swap
    }

    /// Run one conversion attempt to completion
    pub async fn convert(
        &self,
        request: &ConversionRequest,
    ) -> Result<ConversionOutcome, ConvertError> {
        let base = request.base_currency();
        tracing::info!(
            exchange = self.exchange.exchange_name(),
            swap = self.swap.service_name(),
            fiat = %request.fiat_currency,
            deposit = %request.deposit,
            settle = %request.settle,
            "Starting conversion"
        );

        // Step 0: permissions
        let permissions = self.swap.permissions().await.during(ConvertStep::Permissions)?;
        if !permissions.create_shift {
            return Err(ConvertError::ShiftingNotPermitted);
        }

        // Step 1: buy with whatever fiat is available
        let order = self.buy_with_fiat(request, &base).await?;

        // Step 2: fresh balance against fresh limits
        let account = self
            .exchange
            .get_account(&base)
            .await
            .during(ConvertStep::BaseBalance)?;
        let pair = self
            .swap
            .get_pair_limits(&request.deposit, &request.settle)
            .await
            .during(ConvertStep::PairLimits)?;
        let balance = account.balance;
        tracing::info!(
            currency = %base,
            balance = %balance,
            pair_min = %pair.min,
            pair_max = %pair.max,
            "Base balance checked against pair limits"
        );
        if !pair.contains(balance) {
            return Err(if balance < pair.min {
                ConvertError::BelowPairMinimum {
                    balance,
                    minimum: pair.min,
                }
            } else {
                ConvertError::AbovePairMaximum {
                    balance,
                    maximum: pair.max,
                }
            });
        }

        // Step 3: refund address
        let refund = self
            .exchange
            .get_or_create_deposit_address(&base)
            .await
            .during(ConvertStep::RefundAddress)?;
        tracing::info!(refund_address = %refund.address, "Refund address resolved");

        // Step 4: quote and fixed shift
        let quote = self
            .swap
            .create_quote(&request.deposit, &request.settle, balance)
            .await
            .during(ConvertStep::CreateQuote)?;
        if quote.is_expired_at(self.clock.now()) {
            return Err(ConvertError::QuoteExpired {
                quote_id: quote.id,
                expired_at: quote.expires_at,
            });
        }
        let shift = self
            .swap
            .create_fixed_shift(&quote.id, &request.settle_address, &refund.address)
            .await
            .during(ConvertStep::CreateShift)?;
        tracing::info!(
            shift_id = %shift.id,
            quote_id = %quote.id,
            deposit_address = %shift.deposit_address,
            settle_amount = %quote.settle_amount,
            "Shift created"
        );

        // Step 5: withdraw everything to the shift
        let send = SendFunds {
            account_id: account.id,
            to: shift.deposit_address.clone(),
            amount: balance,
            currency: base.clone(),
            idempotency_token: uuid::Uuid::new_v4().to_string(),
        };
        let transaction = self
            .exchange
            .send_funds(&send)
            .await
            .during(ConvertStep::SendFunds)?;

        // Step 6: wait for the swap service
        let final_shift = self
            .swap
            .poll_shift(&shift.id)
            .await
            .during(ConvertStep::PollShift)?;
        let status = final_shift.status().during(ConvertStep::PollShift)?;

        if status.needs_intervention() {
            tracing::error!(shift_id = %final_shift.id, status = %status, "Shift needs manual intervention");
            return Err(ConvertError::ShiftUnderReview {
                shift_id: final_shift.id,
                status,
            });
        }
        if status.is_refund() {
            tracing::warn!(
                shift_id = %final_shift.id,
                status = %status,
                refund_address = %refund.address,
                "Shift is refunding to the exchange"
            );
        } else if !status.is_terminal() {
            tracing::warn!(
                shift_id = %final_shift.id,
                status = %status,
                "Shift expired while still in progress"
            );
        } else {
            tracing::info!(
                shift_id = %final_shift.id,
                settle_amount = ?final_shift.settle_amount,
                settle_hash = ?final_shift.settle_hash,
                "Conversion settled"
            );
        }

        Ok(ConversionOutcome {
            order,
            quote,
            shift: final_shift,
            transaction,
        })
    }

    async fn buy_with_fiat(
        &self,
        request: &ConversionRequest,
        base: &str,
    ) -> Result<Option<OrderResult>, ConvertError> {
        let fiat_balance = self
            .exchange
            .get_balance(&request.fiat_currency)
            .await
            .during(ConvertStep::FiatBalance)?;
        if fiat_balance <= Decimal::ZERO {
            tracing::info!(fiat = %request.fiat_currency, "No fiat balance, skipping order");
            return Ok(None);
        }

        let product_id = request.product_id();
        let limits = self
            .exchange
            .get_product_limits(&product_id)
            .await
            .during(ConvertStep::ProductLimits)?;
        let pair = self
            .swap
            .get_pair_limits(&request.deposit, &request.settle)
            .await
            .during(ConvertStep::PairLimits)?;

        if limits.trading_disabled {
            return Err(ConvertError::TradingDisabled { product: product_id });
        }

        let quote_size = clamp_order_size(fiat_balance, limits.max_order_size);
        if quote_size < limits.min_order_size {
            return Err(ConvertError::OrderBelowMinimum {
                size: quote_size,
                minimum: limits.min_order_size,
            });
        }
        if limits.price <= Decimal::ZERO {
            return Err(ConvertError::InvalidPrice { product: product_id });
        }

        let held = self
            .exchange
            .get_balance(base)
            .await
            .during(ConvertStep::BaseBalance)?;
        let estimated = match quote_size
            .checked_div(limits.price)
            .and_then(|bought| held.checked_add(bought))
        {
            Some(estimated) => estimated,
            None => return Err(ConvertError::InvalidPrice { product: product_id }),
        };
        tracing::info!(
            product = %product_id,
            fiat_balance = %fiat_balance,
            quote_size = %quote_size,
            price = %limits.price,
            estimated_base = %estimated,
            pair_min = %pair.min,
            "Order preflight"
        );
        if estimated < pair.min {
            return Err(ConvertError::InsufficientForShift {
                estimated,
                minimum: pair.min,
            });
        }

        let order = MarketOrder::buy(product_id, quote_size);
        let result = self
            .exchange
            .place_market_order(&order)
            .await
            .during(ConvertStep::PlaceOrder)?;
        if !result.success {
            return Err(ConvertError::OrderRejected {
                reason: result
                    .failure_reason
                    .unwrap_or_else(|| "no reason given".to_string()),
            });
        }
        Ok(Some(result))
    }
}
