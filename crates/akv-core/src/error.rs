//! Error types for akv-core

use thiserror::Error;

/// Result type alias using akv-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for akv
///
/// Configuration errors (`MissingEndpoint`, `InvalidEndpoint`,
/// `NoCredential`) are fatal at startup. Remote errors (`Auth`, `Api`,
/// `Http`) are recovered by the operations facade and surfaced only as
/// negative results plus a logged cause.
#[derive(Error, Debug)]
pub enum Error {
    /// Vault endpoint could not be resolved from flag, environment or .env
    #[error("AZURE_KEYVAULT_URL not found in environment variables or .env file")]
    MissingEndpoint,

    /// Vault endpoint is not a usable URL
    #[error("Invalid vault endpoint '{url}': {message}")]
    InvalidEndpoint { url: String, message: String },

    /// Credential discovery chain exhausted without a usable credential
    #[error(
        "No valid credentials found. Please ensure you have:\n\
         1. Azure CLI installed and logged in (az login)\n\
         2. Or running in Azure with managed identity enabled\n\
         3. AZURE_KEYVAULT_URL set in environment variables"
    )]
    NoCredential,

    /// Authentication rejected by the token endpoint or the vault
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    /// Key Vault returned a non-success status
    #[error("Key Vault API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create an invalid endpoint error
    pub fn invalid_endpoint(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an authentication error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create an API error from a status code and response body
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}
