//! Coinbase Exchange Adapter
//!
//! Implements `CustodialExchange` for Coinbase API keys.
//!
//! This module is organized into submodules:
//! - `config` - Credentials and endpoint loading
//! - `types` - v2/v3 wire types and error envelopes
//! - `signing` - HMAC-SHA256 request signing
//! - `adapter` - Main CoinbaseClient implementation

mod adapter;
mod config;
mod signing;
mod types;

pub use adapter::CoinbaseClient;
pub use config::{CoinbaseConfig, COINBASE_API_VERSION, COINBASE_BASE_URL};
pub use signing::CoinbaseSigner;
