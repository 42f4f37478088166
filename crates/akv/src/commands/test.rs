//! `akv test` - verify connectivity to the Key Vault

use anyhow::{bail, Result};

use crate::output;

pub async fn run(vault_url: Option<String>, insecure: bool) -> Result<()> {
    let ops = super::connect(vault_url, insecure).await?;

    output::info("Testing connection...");
    match ops.test_connection().await {
        Some(count) => {
            output::success(&format!(
                "Connection to Key Vault successful! Found {count} secrets."
            ));
            Ok(())
        }
        None => {
            output::error("Connection to Key Vault failed");
            output::header("Troubleshooting suggestions");
            output::item("For internal Key Vaults, try setting DISABLE_SSL_VERIFY=true");
            output::item("Verify your Azure credentials with 'az login'");
            output::item("Check if the Key Vault URL is correct");
            bail!("connection test failed");
        }
    }
}
