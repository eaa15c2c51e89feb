//! Fiat Bridge
//!
//! Converts a fiat balance held at a custodial exchange into a
//! cryptocurrency delivered to an external address:
//! - Signed REST clients (Coinbase, Kraken, SideShift)
//! - Fixed-rate shift orchestration with pre-transfer limit checks
//! - Shift status polling

pub mod adapters;
pub mod config;
pub mod core;
pub mod error;

pub use error::AppError;
