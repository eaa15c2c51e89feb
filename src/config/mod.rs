//! Configuration module for conversion settings and YAML loading
//!
//! This module provides:
//! - Configuration types (`AppConfig`, `ConversionConfig`)
//! - YAML loading functionality (`load_config`)
//! - Logging initialization (`init_logging`)
//! - Application constants with environment variable overrides

pub mod constants;
mod loader;
pub mod logging;
mod types;

// Re-export types
pub use types::{AppConfig, ConversionConfig};

// Re-export loader functions
pub use loader::{load_config, load_config_from_str};

pub use logging::init_logging;
