//! akv - Azure Key Vault secrets CLI
//!
//! This is the main entry point for the akv command-line interface.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize rustls crypto provider (required for rustls 0.23+)
    // This must be done before any TLS operations
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    // Usage errors exit 1, matching the rest of the failure surface
    let cli = Cli::parse_or_exit();

    init_tracing(cli.verbose, cli.quiet);

    let vault_url = cli.vault_url;
    let insecure = cli.insecure;

    match cli.command {
        Commands::Test => commands::test::run(vault_url, insecure).await,
        Commands::Get(args) => commands::get::run(args, vault_url, insecure).await,
        Commands::Set(args) => commands::set::run(args, vault_url, insecure).await,
        Commands::List => commands::list::run(vault_url, insecure).await,
        Commands::GetMultiple(args) => {
            commands::get_multiple::run(args, vault_url, insecure).await
        }
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
