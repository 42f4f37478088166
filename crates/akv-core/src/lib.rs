//! # akv-core
//!
//! Core library for the akv CLI providing:
//! - Vault endpoint configuration (flag / environment / .env resolution)
//! - Error taxonomy shared across the workspace

pub mod config;
pub mod error;

pub use config::{VaultConfig, ENDPOINT_VAR, SKIP_VERIFY_VAR};
pub use error::{Error, Result};
