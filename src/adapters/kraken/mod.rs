//! Kraken Exchange Adapter
//!
//! Private REST client (balances and market orders) signed with
//! HMAC-SHA512 over a SHA256 prehash.
//!
//! This module is organized into submodules:
//! - `config` - Credentials and endpoint loading
//! - `types` - Response envelope and order types
//! - `signing` - Nonce and API-Sign computation
//! - `adapter` - Main KrakenClient implementation

mod adapter;
mod config;
mod signing;
mod types;

pub use adapter::KrakenClient;
pub use config::{KrakenConfig, KRAKEN_BASE_URL};
pub use signing::KrakenSigner;
pub use types::{KrakenAddOrderResult, KrakenMarketOrder, KrakenOrderDescription};
