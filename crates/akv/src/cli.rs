//! CLI argument parsing with clap

use clap::{Args, Parser, Subcommand};

/// akv - Azure Key Vault secrets CLI
#[derive(Parser, Debug)]
#[command(name = "akv")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Key Vault endpoint URL (overrides AZURE_KEYVAULT_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub vault_url: Option<String>,

    /// Disable TLS certificate verification (testing only)
    #[arg(long, global = true)]
    pub insecure: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Test the connection to the Key Vault
    Test,

    /// Get a secret value
    Get(GetArgs),

    /// Set a secret value
    Set(SetArgs),

    /// List secret names
    List,

    /// Get several secrets in one invocation
    #[command(name = "get-multiple")]
    GetMultiple(GetMultipleArgs),
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Name of the secret to retrieve
    pub name: String,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Name of the secret
    pub name: String,

    /// Value of the secret
    pub value: String,
}

#[derive(Args, Debug)]
pub struct GetMultipleArgs {
    /// Names of the secrets to retrieve
    #[arg(required = true)]
    pub names: Vec<String>,
}

impl Cli {
    /// Parse argv, exiting 0 for help/version and 1 for usage errors
    pub fn parse_or_exit() -> Self {
        match Self::try_parse() {
            Ok(cli) => cli,
            Err(err) => {
                let code = usage_exit_code(&err);
                let _ = err.print();
                std::process::exit(code);
            }
        }
    }
}

/// Exit code for a parse failure: help/version requests succeed,
/// anything else is a usage error
fn usage_exit_code(err: &clap::Error) -> i32 {
    use clap::error::ErrorKind;
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_get_multiple() {
        let cli = Cli::parse_from(["akv", "get-multiple", "a", "b", "c"]);
        match cli.command {
            Commands::GetMultiple(args) => assert_eq!(args.names, vec!["a", "b", "c"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn get_multiple_requires_at_least_one_name() {
        assert!(Cli::try_parse_from(["akv", "get-multiple"]).is_err());
    }

    #[test]
    fn usage_errors_exit_with_code_1() {
        let err = Cli::try_parse_from(["akv"]).unwrap_err();
        assert_eq!(usage_exit_code(&err), 1);

        let err = Cli::try_parse_from(["akv", "get"]).unwrap_err();
        assert_eq!(usage_exit_code(&err), 1);

        let err = Cli::try_parse_from(["akv", "frobnicate"]).unwrap_err();
        assert_eq!(usage_exit_code(&err), 1);
    }

    #[test]
    fn help_and_version_exit_cleanly() {
        let err = Cli::try_parse_from(["akv", "--help"]).unwrap_err();
        assert_eq!(usage_exit_code(&err), 0);

        let err = Cli::try_parse_from(["akv", "--version"]).unwrap_err();
        assert_eq!(usage_exit_code(&err), 0);
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::parse_from([
            "akv",
            "--vault-url",
            "https://v.example.com",
            "--insecure",
            "list",
        ]);
        assert_eq!(cli.vault_url.as_deref(), Some("https://v.example.com"));
        assert!(cli.insecure);
        assert!(matches!(cli.command, Commands::List));
    }
}
