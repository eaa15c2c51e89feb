//! Service adapters for Coinbase, Kraken and SideShift
//!
//! This module provides the signed REST plumbing shared by every client
//! and the two service abstractions the orchestrator drives.

pub mod clock;
pub mod coinbase;
pub mod errors;
pub mod kraken;
pub mod rest;
pub mod shared;
pub mod sideshift;
pub mod signing;
pub mod traits;
pub mod types;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use errors::{ExchangeError, ExchangeResult};
pub use rest::SignedClient;
pub use signing::{RequestBody, RequestSigner, SigningPayload};
pub use traits::{CustodialExchange, SwapService};
pub use types::{
    Account, Coin, DepositAddress, MarketOrder, OrderResult, OrderSide, PairLimits,
    Permissions, ProductLimits, Quote, SendFunds, Shift, ShiftStatus, Transaction,
};
pub use coinbase::{CoinbaseClient, CoinbaseConfig};
pub use kraken::{KrakenClient, KrakenConfig};
pub use sideshift::{SideShiftClient, SideShiftConfig};
