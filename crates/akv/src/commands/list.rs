//! `akv list` - list secret names

use anyhow::Result;

use crate::output;

pub async fn run(vault_url: Option<String>, insecure: bool) -> Result<()> {
    let ops = super::connect(vault_url, insecure).await?;

    let names = ops.list().await;
    if names.is_empty() {
        // Empty store and unreachable store both land here; the cause,
        // if any, is in the logs
        output::info("No secrets found or error occurred");
    } else {
        output::header("Available secrets");
        for name in &names {
            output::item(name);
        }
    }

    Ok(())
}
