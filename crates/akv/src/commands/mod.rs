//! Command implementations

pub mod get;
pub mod get_multiple;
pub mod list;
pub mod set;
pub mod test;

use akv_core::VaultConfig;
use akv_secrets::{DefaultCredentialChain, SecretClient, SecretOps, TokenCredential, VAULT_SCOPE};
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::output;

/// Resolve configuration, obtain a credential handle and build the
/// operations facade. Fails fast with guidance when the endpoint or a
/// credential cannot be resolved.
pub(crate) async fn connect(vault_url: Option<String>, insecure: bool) -> Result<SecretOps> {
    let config = VaultConfig::resolve(vault_url, insecure, Path::new("."))?;

    output::info(&format!("Connecting to Key Vault: {}", config.endpoint));
    if config.disable_tls_verify {
        output::warning("TLS verification is disabled");
    }

    let credential = Arc::new(DefaultCredentialChain::new());
    // Probe the chain up front; the token is cached for the operation
    credential.get_token(VAULT_SCOPE).await?;

    let client = SecretClient::new(&config, credential)?;
    Ok(SecretOps::new(client))
}
