//! `akv get` - retrieve a single secret

use anyhow::Result;

use crate::cli::GetArgs;
use crate::output;

pub async fn run(args: GetArgs, vault_url: Option<String>, insecure: bool) -> Result<()> {
    let ops = super::connect(vault_url, insecure).await?;

    match ops.get(&args.name).await {
        Some(value) => println!("{}: {}", args.name, value),
        None => output::warning(&format!(
            "Secret '{}' not found or error occurred",
            args.name
        )),
    }

    Ok(())
}
