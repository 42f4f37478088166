//! Credential discovery for Key Vault access
//!
//! Credentials are an injected capability: the client only asks a
//! [`TokenCredential`] for a bearer token. [`DefaultCredentialChain`]
//! tries an ordered list of strategies (environment service principal,
//! Azure CLI session, managed identity) until one succeeds.

use akv_core::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::process::Command;
use tokio::sync::RwLock;
use tracing::debug;

/// OAuth2 scope for Key Vault data-plane access
pub const VAULT_SCOPE: &str = "https://vault.azure.net/.default";

/// Seconds of remaining validity below which a cached token is refreshed
const EXPIRY_MARGIN_SECS: i64 = 60;

/// IMDS token endpoint for managed identity
const IMDS_TOKEN_URL: &str = "http://169.254.169.254/metadata/identity/oauth2/token";

/// A bearer token for the vault
#[derive(Clone)]
pub struct AccessToken {
    pub token: String,
    /// Unix timestamp of expiry, when the issuer reported one
    pub expires_on: Option<i64>,
}

impl AccessToken {
    fn is_current(&self) -> bool {
        match self.expires_on {
            Some(expires_on) => {
                let now = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_secs() as i64)
                    .unwrap_or(i64::MAX);
                expires_on - now > EXPIRY_MARGIN_SECS
            }
            // One token per CLI invocation; without an expiry it outlives the process
            None => true,
        }
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AccessToken([REDACTED {} bytes], expires_on={:?})",
            self.token.len(),
            self.expires_on
        )
    }
}

/// Trait for credential providers
#[async_trait]
pub trait TokenCredential: Send + Sync {
    /// Obtain a bearer token for the given OAuth2 scope
    async fn get_token(&self, scope: &str) -> Result<AccessToken>;
}

/// Fixed-token credential for tests and pre-acquired tokens
pub struct StaticCredential {
    token: String,
}

impl StaticCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenCredential for StaticCredential {
    async fn get_token(&self, _scope: &str) -> Result<AccessToken> {
        Ok(AccessToken {
            token: self.token.clone(),
            expires_on: None,
        })
    }
}

/// Ordered credential discovery chain, first success wins:
/// 1. Environment service principal (AZURE_TENANT_ID / AZURE_CLIENT_ID /
///    AZURE_CLIENT_SECRET)
/// 2. Azure CLI login session (`az account get-access-token`)
/// 3. Managed identity via IMDS
pub struct DefaultCredentialChain {
    http: reqwest::Client,
    imds_url: String,
    token_cache: RwLock<Option<AccessToken>>,
}

#[derive(Deserialize)]
struct OAuthTokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AzCliTokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct ImdsTokenResponse {
    access_token: String,
    #[serde(default)]
    expires_on: Option<String>,
}

impl DefaultCredentialChain {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            imds_url: IMDS_TOKEN_URL.to_string(),
            token_cache: RwLock::new(None),
        }
    }

    #[cfg(test)]
    fn with_imds_url(imds_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            imds_url: imds_url.into(),
            token_cache: RwLock::new(None),
        }
    }

    /// Service principal from environment variables; skipped when unset
    async fn try_environment(&self, scope: &str) -> Result<Option<AccessToken>> {
        let (tenant, client_id, client_secret) = match (
            std::env::var("AZURE_TENANT_ID"),
            std::env::var("AZURE_CLIENT_ID"),
            std::env::var("AZURE_CLIENT_SECRET"),
        ) {
            (Ok(t), Ok(i), Ok(s)) if !t.is_empty() && !i.is_empty() && !s.is_empty() => (t, i, s),
            _ => {
                debug!("Environment service principal not configured");
                return Ok(None);
            }
        };

        let url = format!("https://login.microsoftonline.com/{tenant}/oauth2/v2.0/token");
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("scope", scope),
        ];

        let response = self.http.post(&url).form(&params).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::auth(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        let token: OAuthTokenResponse = response.json().await?;
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        Ok(Some(AccessToken {
            token: token.access_token,
            expires_on: token.expires_in.map(|e| now + e),
        }))
    }

    /// Ambient Azure CLI login session; skipped when `az` is missing or
    /// not logged in
    async fn try_azure_cli(&self, resource: &str) -> Result<Option<AccessToken>> {
        let output = match Command::new("az")
            .args([
                "account",
                "get-access-token",
                "--resource",
                resource,
                "--output",
                "json",
            ])
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                debug!("Azure CLI not available: {e}");
                return Ok(None);
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("az account get-access-token failed: {}", stderr.trim());
            return Ok(None);
        }

        match serde_json::from_slice::<AzCliTokenResponse>(&output.stdout) {
            Ok(token) => Ok(Some(AccessToken {
                token: token.access_token,
                expires_on: None,
            })),
            Err(e) => {
                // Malformed output skips this strategy, it does not end the chain
                debug!("Could not parse az access token output: {e}");
                Ok(None)
            }
        }
    }

    /// Managed identity via the instance metadata service; skipped when
    /// IMDS is unreachable (i.e. not running in Azure)
    async fn try_managed_identity(&self, resource: &str) -> Result<Option<AccessToken>> {
        let response = match self
            .http
            .get(&self.imds_url)
            .query(&[("api-version", "2018-02-01"), ("resource", resource)])
            .header("Metadata", "true")
            .timeout(Duration::from_secs(2))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                debug!("IMDS not reachable: {e}");
                return Ok(None);
            }
        };

        if !response.status().is_success() {
            debug!("IMDS token request returned {}", response.status());
            return Ok(None);
        }

        let token: ImdsTokenResponse = response.json().await?;
        Ok(Some(AccessToken {
            expires_on: token.expires_on.and_then(|e| e.parse().ok()),
            token: token.access_token,
        }))
    }
}

impl Default for DefaultCredentialChain {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenCredential for DefaultCredentialChain {
    async fn get_token(&self, scope: &str) -> Result<AccessToken> {
        {
            let cache = self.token_cache.read().await;
            if let Some(token) = cache.as_ref() {
                if token.is_current() {
                    return Ok(token.clone());
                }
            }
        }

        let resource = scope.trim_end_matches("/.default");

        let token = if let Some(token) = self.try_environment(scope).await? {
            debug!("Credential resolved from environment service principal");
            token
        } else if let Some(token) = self.try_azure_cli(resource).await? {
            debug!("Credential resolved from Azure CLI session");
            token
        } else if let Some(token) = self.try_managed_identity(resource).await? {
            debug!("Credential resolved from managed identity");
            token
        } else {
            return Err(Error::NoCredential);
        };

        let mut cache = self.token_cache.write().await;
        *cache = Some(token.clone());
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[tokio::test]
    async fn static_credential_returns_token() {
        let cred = StaticCredential::new("tok-123");
        let token = cred.get_token(VAULT_SCOPE).await.unwrap();
        assert_eq!(token.token, "tok-123");
        assert!(token.expires_on.is_none());
    }

    #[test]
    fn debug_redacts_token() {
        let token = AccessToken {
            token: "super-secret".to_string(),
            expires_on: Some(42),
        };
        let repr = format!("{token:?}");
        assert!(!repr.contains("super-secret"));
        assert!(repr.contains("REDACTED"));
    }

    #[test]
    fn token_without_expiry_stays_current() {
        let token = AccessToken {
            token: "t".to_string(),
            expires_on: None,
        };
        assert!(token.is_current());
    }

    #[test]
    fn expired_token_is_not_current() {
        let token = AccessToken {
            token: "t".to_string(),
            expires_on: Some(0),
        };
        assert!(!token.is_current());
    }

    fn clear_service_principal_env() {
        std::env::remove_var("AZURE_TENANT_ID");
        std::env::remove_var("AZURE_CLIENT_ID");
        std::env::remove_var("AZURE_CLIENT_SECRET");
    }

    #[tokio::test]
    #[serial]
    async fn environment_strategy_skipped_when_unset() {
        clear_service_principal_env();

        let chain = DefaultCredentialChain::new();
        let result = chain.try_environment(VAULT_SCOPE).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    #[serial]
    async fn exhausted_chain_yields_guidance_error() {
        clear_service_principal_env();

        // No az binary on an empty PATH, and an IMDS endpoint on a
        // closed port so the managed-identity probe fails immediately
        let empty_bin = tempfile::tempdir().unwrap();
        let old_path = std::env::var_os("PATH");
        std::env::set_var("PATH", empty_bin.path());

        let chain = DefaultCredentialChain::with_imds_url("http://127.0.0.1:9/metadata/identity/oauth2/token");
        let result = chain.get_token(VAULT_SCOPE).await;

        match old_path {
            Some(path) => std::env::set_var("PATH", path),
            None => std::env::remove_var("PATH"),
        }

        let err = result.unwrap_err();
        assert!(matches!(err, akv_core::Error::NoCredential));
        let msg = err.to_string();
        assert!(msg.contains("az login"));
        assert!(msg.contains("managed identity"));
    }

    #[cfg(unix)]
    #[tokio::test]
    #[serial]
    async fn malformed_az_output_skips_strategy() {
        use std::os::unix::fs::PermissionsExt;

        // Stub `az` that prints something that is not a token document
        let bin = tempfile::tempdir().unwrap();
        let az = bin.path().join("az");
        std::fs::write(&az, "#!/bin/sh\necho 'please run az login'\n").unwrap();
        std::fs::set_permissions(&az, std::fs::Permissions::from_mode(0o755)).unwrap();

        let old_path = std::env::var_os("PATH");
        std::env::set_var("PATH", bin.path());

        let chain = DefaultCredentialChain::new();
        let result = chain.try_azure_cli("https://vault.azure.net").await;

        match old_path {
            Some(path) => std::env::set_var("PATH", path),
            None => std::env::remove_var("PATH"),
        }

        assert!(matches!(result, Ok(None)));
    }
}
