//! Core module - conversion workflow and shift polling
//!
//! This module uses explicit re-exports instead of glob exports.
//!
//! ## Usage
//! ```ignore
//! use fiat_bridge::core::{Converter, ConversionRequest};
//! ```

pub mod convert;
pub mod poll;

pub use convert::{clamp_order_size, ConversionOutcome, ConversionRequest, Converter};
pub use poll::poll_shift;
