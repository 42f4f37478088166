//! Secrets access for the akv CLI
//!
//! This crate provides:
//! - **Trust classification**: strict vs relaxed TLS per endpoint
//! - **Credential discovery**: ordered chain (environment service
//!   principal, Azure CLI, managed identity) behind a trait seam
//! - **REST client**: Key Vault secrets data-plane over reqwest/rustls
//! - **Operations facade**: the error-collapsing get/set/list surface

pub mod client;
pub mod credential;
pub mod ops;
pub mod trust;

pub use client::{SecretClient, API_VERSION};
pub use credential::{
    AccessToken, DefaultCredentialChain, StaticCredential, TokenCredential, VAULT_SCOPE,
};
pub use ops::SecretOps;
pub use trust::TrustMode;
