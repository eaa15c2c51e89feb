//! SideShift Swap Service Adapter
//!
//! Implements `SwapService` against the SideShift v2 REST API.
//!
//! This module is organized into submodules:
//! - `config` - Secret, affiliate id and endpoint loading
//! - `types` - Request bodies and error envelope
//! - `signing` - Secret-header authentication
//! - `adapter` - Main SideShiftClient implementation

mod adapter;
mod config;
mod signing;
mod types;

pub use adapter::SideShiftClient;
pub use config::{SideShiftConfig, SIDESHIFT_BASE_URL};
pub use signing::SideShiftSigner;
