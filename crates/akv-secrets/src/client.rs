//! Key Vault REST client
//!
//! Thin client over the secrets data-plane API. Not-found is part of the
//! contract (`Ok(None)`); every other failure is an error for the
//! operations facade to collapse.

use crate::credential::{TokenCredential, VAULT_SCOPE};
use crate::trust::TrustMode;
use akv_core::{Error, Result, VaultConfig};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Key Vault secrets API version
pub const API_VERSION: &str = "7.4";

/// Client for a single vault endpoint
pub struct SecretClient {
    endpoint: String,
    http: reqwest::Client,
    credential: Arc<dyn TokenCredential>,
}

#[derive(Deserialize)]
struct SecretBundle {
    value: String,
}

#[derive(Deserialize)]
struct SecretItem {
    id: String,
}

#[derive(Deserialize)]
struct SecretListPage {
    #[serde(default)]
    value: Vec<SecretItem>,
    #[serde(rename = "nextLink")]
    next_link: Option<String>,
}

impl SecretClient {
    /// Build a client for the configured endpoint. The trust mode is
    /// evaluated once here and never re-evaluated.
    pub fn new(config: &VaultConfig, credential: Arc<dyn TokenCredential>) -> Result<Self> {
        let trust = TrustMode::resolve(&config.host, config.disable_tls_verify);

        let builder = match trust {
            TrustMode::Relaxed => reqwest::Client::builder().danger_accept_invalid_certs(true),
            TrustMode::Strict => {
                reqwest::Client::builder().min_tls_version(reqwest::tls::Version::TLS_1_2)
            }
        };

        Ok(Self {
            endpoint: config.endpoint.clone(),
            http: builder.build()?,
            credential,
        })
    }

    /// Endpoint this client talks to (normalized, trailing slash)
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn bearer(&self) -> Result<String> {
        Ok(self.credential.get_token(VAULT_SCOPE).await?.token)
    }

    /// Fetch a secret value; `Ok(None)` when the vault has no such secret
    pub async fn get_secret(&self, name: &str) -> Result<Option<String>> {
        let url = format!("{}secrets/{}?api-version={}", self.endpoint, name, API_VERSION);
        let token = self.bearer().await?;

        let response = self.http.get(&url).bearer_auth(&token).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let bundle: SecretBundle = response.json().await?;
                debug!("Retrieved secret '{name}'");
                Ok(Some(bundle.value))
            }
            status => Err(api_error(status, response).await),
        }
    }

    /// Write a secret value; `Ok(())` only when the vault confirms it
    pub async fn set_secret(&self, name: &str, value: &str) -> Result<()> {
        let url = format!("{}secrets/{}?api-version={}", self.endpoint, name, API_VERSION);
        let token = self.bearer().await?;

        let response = self
            .http
            .put(&url)
            .bearer_auth(&token)
            .json(&json!({ "value": value }))
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            debug!("Stored secret '{name}'");
            Ok(())
        } else {
            Err(api_error(status, response).await)
        }
    }

    /// List all secret names, following pagination
    pub async fn list_secrets(&self) -> Result<Vec<String>> {
        let token = self.bearer().await?;
        let mut names = Vec::new();
        let mut next = Some(format!(
            "{}secrets?api-version={}",
            self.endpoint, API_VERSION
        ));

        while let Some(url) = next.take() {
            let response = self.http.get(&url).bearer_auth(&token).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(api_error(status, response).await);
            }

            let page: SecretListPage = response.json().await?;
            names.extend(page.value.iter().filter_map(|item| secret_name(&item.id)));
            next = page.next_link.filter(|link| !link.is_empty());
        }

        debug!("Listed {} secrets", names.len());
        Ok(names)
    }
}

/// Extract the secret name from an id URL like
/// `https://vault/secrets/my-secret`
fn secret_name(id: &str) -> Option<String> {
    id.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

async fn api_error(status: StatusCode, response: reqwest::Response) -> Error {
    let body = response.text().await.unwrap_or_default();
    let message = if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        body
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::auth(message),
        _ => Error::api(status.as_u16(), message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::StaticCredential;

    #[test]
    fn secret_name_from_id_url() {
        assert_eq!(
            secret_name("https://v.vault.azure.net/secrets/db-password"),
            Some("db-password".to_string())
        );
        assert_eq!(
            secret_name("https://v.vault.azure.net/secrets/db-password/"),
            Some("db-password".to_string())
        );
        assert_eq!(secret_name(""), None);
    }

    #[test]
    fn client_carries_normalized_endpoint() {
        let config = VaultConfig::new("https://v.example.com", false).unwrap();
        let client =
            SecretClient::new(&config, Arc::new(StaticCredential::new("t"))).unwrap();
        assert_eq!(client.endpoint(), "https://v.example.com/");
    }
}
