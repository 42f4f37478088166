//! Secret operations facade
//!
//! Collapses all remote failures into negative results, matching the
//! behavior callers of the original client depend on: not-found, auth
//! failure and network failure are indistinguishable at this boundary.
//! The underlying cause is logged, never propagated.

use crate::client::SecretClient;
use tracing::error;

/// Collapsing facade over [`SecretClient`]
pub struct SecretOps {
    client: SecretClient,
}

impl SecretOps {
    pub fn new(client: SecretClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &SecretClient {
        &self.client
    }

    /// Get a secret value, or `None` when absent or on any remote error
    pub async fn get(&self, name: &str) -> Option<String> {
        match self.client.get_secret(name).await {
            Ok(value) => value,
            Err(e) => {
                error!("Error retrieving secret '{name}': {e}");
                None
            }
        }
    }

    /// Set a secret; `true` only when the vault confirmed the write
    pub async fn set(&self, name: &str, value: &str) -> bool {
        match self.client.set_secret(name, value).await {
            Ok(()) => true,
            Err(e) => {
                error!("Error setting secret '{name}': {e}");
                false
            }
        }
    }

    /// List secret names. An unreachable vault yields an empty list,
    /// indistinguishable from a vault with zero secrets (documented
    /// limitation of this boundary).
    pub async fn list(&self) -> Vec<String> {
        match self.client.list_secrets().await {
            Ok(names) => names,
            Err(e) => {
                error!("Error listing secrets: {e}");
                Vec::new()
            }
        }
    }

    /// Get several secrets sequentially; each name resolves
    /// independently, insertion order preserved
    pub async fn get_many(&self, names: &[String]) -> Vec<(String, Option<String>)> {
        let mut results = Vec::with_capacity(names.len());
        for name in names {
            let value = self.get(name).await;
            results.push((name.clone(), value));
        }
        results
    }

    /// Test connectivity by listing secrets; `Some(count)` on success,
    /// `None` on any failure (cause logged)
    pub async fn test_connection(&self) -> Option<usize> {
        match self.client.list_secrets().await {
            Ok(names) => Some(names.len()),
            Err(e) => {
                error!("Connection to Key Vault failed: {e}");
                None
            }
        }
    }
}
