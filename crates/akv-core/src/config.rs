//! Vault endpoint configuration
//!
//! Resolution precedence (highest to lowest):
//! 1. Explicit `--vault-url` flag
//! 2. Process environment
//! 3. `.env` file in the working directory
//!
//! No process-global state: the resolved configuration is an explicit
//! struct handed to the client constructor.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;
use url::Url;

/// Environment variable naming the Key Vault endpoint URL
pub const ENDPOINT_VAR: &str = "AZURE_KEYVAULT_URL";

/// Environment variable forcing relaxed TLS regardless of classification
pub const SKIP_VERIFY_VAR: &str = "DISABLE_SSL_VERIFY";

/// Resolved Key Vault configuration, immutable after construction
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// Endpoint URL, normalized to end with `/`
    pub endpoint: String,
    /// Hostname component of the endpoint
    pub host: String,
    /// Force relaxed TLS (no certificate verification)
    pub disable_tls_verify: bool,
}

impl VaultConfig {
    /// Resolve configuration from an explicit endpoint, the process
    /// environment and a `.env` file under `base_dir`.
    pub fn resolve(endpoint: Option<String>, insecure: bool, base_dir: &Path) -> Result<Self> {
        let dotenv = load_env_file(&base_dir.join(".env"));

        let endpoint = endpoint
            .or_else(|| std::env::var(ENDPOINT_VAR).ok().filter(|v| !v.is_empty()))
            .or_else(|| dotenv.get(ENDPOINT_VAR).cloned().filter(|v| !v.is_empty()))
            .ok_or(Error::MissingEndpoint)?;

        let disable_tls_verify = insecure
            || std::env::var(SKIP_VERIFY_VAR)
                .map(|v| is_enabled(&v))
                .unwrap_or(false)
            || dotenv.get(SKIP_VERIFY_VAR).map(|v| is_enabled(v)).unwrap_or(false);

        Self::new(endpoint, disable_tls_verify)
    }

    /// Build a configuration from explicit values, normalizing the endpoint
    pub fn new(endpoint: impl Into<String>, disable_tls_verify: bool) -> Result<Self> {
        let mut endpoint = endpoint.into();

        let parsed = Url::parse(&endpoint)
            .map_err(|e| Error::invalid_endpoint(&endpoint, e.to_string()))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| Error::invalid_endpoint(&endpoint, "missing hostname"))?
            .to_string();

        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }

        Ok(Self {
            endpoint,
            host,
            disable_tls_verify,
        })
    }
}

/// Check a flag value the way the original toggles are spelled
fn is_enabled(value: &str) -> bool {
    let v = value.trim().to_ascii_lowercase();
    v == "true" || v == "1"
}

/// Parse a `.env` file into a map; missing file yields an empty map
fn load_env_file(path: &Path) -> HashMap<String, String> {
    let mut vars = HashMap::new();

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return vars,
    };
    debug!("Loading .env from: {}", path.display());

    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(pos) = line.find('=') {
            let key = line[..pos].trim().to_string();
            let value = line[pos + 1..].trim();

            // Handle quoted values
            let value = if (value.starts_with('"') && value.ends_with('"') && value.len() >= 2)
                || (value.starts_with('\'') && value.ends_with('\'') && value.len() >= 2)
            {
                value[1..value.len() - 1].to_string()
            } else {
                value.to_string()
            };

            vars.insert(key, value);
        } else {
            debug!(
                "Skipping malformed line {} in {}: {}",
                idx + 1,
                path.display(),
                line
            );
        }
    }

    vars
}
