//! `akv set` - store a secret

use anyhow::{bail, Result};

use crate::cli::SetArgs;
use crate::output;

pub async fn run(args: SetArgs, vault_url: Option<String>, insecure: bool) -> Result<()> {
    let ops = super::connect(vault_url, insecure).await?;

    if ops.set(&args.name, &args.value).await {
        output::success(&format!("Secret '{}' set successfully", args.name));
        Ok(())
    } else {
        bail!("Failed to set secret '{}'", args.name);
    }
}
