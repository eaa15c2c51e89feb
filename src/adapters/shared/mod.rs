//! Shared helpers for service clients
//!
//! Environment loading and path-segment validation used by every
//! `*Config::from_env()` and typed client.

pub mod env;

pub use env::{base_url_from_env, optional_env, path_segment, required_env};
