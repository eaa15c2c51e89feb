//! Application-wide error types using thiserror
//!
//! `ConvertError` is what a conversion attempt fails with; `AppError` wraps
//! everything the binary can hit (config, exchange, conversion, IO).

use rust_decimal::Decimal;
use thiserror::Error;

use crate::adapters::errors::ExchangeError;
use crate::adapters::types::ShiftStatus;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Exchange error: {0}")]
    Exchange(#[from] ExchangeError),

    #[error("Conversion failed: {0}")]
    Convert(#[from] ConvertError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Orchestrator step an external failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertStep {
    Permissions,
    FiatBalance,
    ProductLimits,
    PairLimits,
    PlaceOrder,
    BaseBalance,
    RefundAddress,
    CreateQuote,
    CreateShift,
    SendFunds,
    PollShift,
}

impl std::fmt::Display for ConvertStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConvertStep::Permissions => "checking shift permissions",
            ConvertStep::FiatBalance => "fetching fiat balance",
            ConvertStep::ProductLimits => "fetching product limits",
            ConvertStep::PairLimits => "fetching pair limits",
            ConvertStep::PlaceOrder => "placing market order",
            ConvertStep::BaseBalance => "fetching base balance",
            ConvertStep::RefundAddress => "resolving refund address",
            ConvertStep::CreateQuote => "creating quote",
            ConvertStep::CreateShift => "creating shift",
            ConvertStep::SendFunds => "sending funds",
            ConvertStep::PollShift => "polling shift",
        };
        f.write_str(name)
    }
}

/// Why a conversion attempt stopped
///
/// Every variant is fatal to the attempt; the whole workflow must be
/// restarted rather than resumed.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// An external call failed
    #[error("while {step}: {source}")]
    Step {
        step: ConvertStep,
        #[source]
        source: ExchangeError,
    },

    #[error("swap service account is not permitted to create shifts")]
    ShiftingNotPermitted,

    #[error("trading is disabled for {product}")]
    TradingDisabled { product: String },

    #[error("order size {size} is below the product minimum {minimum}")]
    OrderBelowMinimum { size: Decimal, minimum: Decimal },

    #[error("product {product} reports a non-positive price")]
    InvalidPrice { product: String },

    #[error("estimated balance {estimated} after ordering is below the shift minimum {minimum}")]
    InsufficientForShift { estimated: Decimal, minimum: Decimal },

    #[error("order rejected: {reason}")]
    OrderRejected { reason: String },

    #[error("balance {balance} is below the shift minimum {minimum}")]
    BelowPairMinimum { balance: Decimal, minimum: Decimal },

    #[error("balance {balance} is above the shift maximum {maximum}")]
    AbovePairMaximum { balance: Decimal, maximum: Decimal },

    #[error("quote {quote_id} expired at {expired_at}")]
    QuoteExpired {
        quote_id: String,
        expired_at: chrono::DateTime<chrono::Utc>,
    },

    /// Funds are held by the swap service until someone intervenes
    #[error("shift {shift_id} needs manual intervention (status: {status})")]
    ShiftUnderReview { shift_id: String, status: ShiftStatus },
}

impl ConvertError {
    /// Step the failure happened in, for external-call failures
    pub fn step(&self) -> Option<ConvertStep> {
        match self {
            ConvertError::Step { step, .. } => Some(*step),
            _ => None,
        }
    }
}

/// Attach the orchestrator step to an external-call result
pub trait StepContext<T> {
    fn during(self, step: ConvertStep) -> std::result::Result<T, ConvertError>;
}

impl<T> StepContext<T> for std::result::Result<T, ExchangeError> {
    fn during(self, step: ConvertStep) -> std::result::Result<T, ConvertError> {
        self.map_err(|source| ConvertError::Step { step, source })
    }
}
