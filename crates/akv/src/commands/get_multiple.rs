//! `akv get-multiple` - retrieve several secrets in one invocation

use anyhow::Result;

use crate::cli::GetMultipleArgs;

pub async fn run(args: GetMultipleArgs, vault_url: Option<String>, insecure: bool) -> Result<()> {
    let ops = super::connect(vault_url, insecure).await?;

    for (name, value) in ops.get_many(&args.names).await {
        match value {
            Some(value) => println!("{}: {}", name, value),
            None => println!("{}: [NOT FOUND]", name),
        }
    }

    Ok(())
}
