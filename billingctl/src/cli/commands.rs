//! CLI command and subcommand definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Billing CLI
#[derive(Parser, Debug)]
#[command(name = "billing")]
#[command(version, about = "Manage the payment cards on a billing account", long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Print diagnostics while running
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    /// Local config file, merged over the global config
    #[arg(short = 'A', long = "local-config", value_name = "FILE", global = true)]
    pub local_config: Option<PathBuf>,

    /// Global config directory (default: ~/.config/billing)
    #[arg(short = 'Q', long = "global-config", value_name = "DIR", global = true)]
    pub global_config: Option<PathBuf>,

    /// API token (overrides config files and BILLING_TOKEN)
    #[arg(short = 't', long, value_name = "TOKEN", global = true)]
    pub token: Option<String>,

    /// Operate on this team's account instead of your own
    #[arg(short = 'T', long, value_name = "SLUG", global = true)]
    pub team: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the cards on the account
    #[command(alias = "list")]
    Ls,

    /// Choose which card future charges go to
    #[command(name = "set-default")]
    SetDefault {
        /// Card id (omit to pick interactively)
        card_id: Option<String>,
    },

    /// Remove a card from the account
    #[command(alias = "remove")]
    Rm {
        /// Card id (omit to pick interactively)
        card_id: Option<String>,
    },

    /// Add a new card interactively
    Add,

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_ls_alias() {
        let cli = Cli::try_parse_from(["billing", "list"]).unwrap();
        assert!(matches!(cli.command, Commands::Ls));
    }

    #[test]
    fn test_set_default_with_id() {
        let cli = Cli::try_parse_from(["billing", "set-default", "card_2"]).unwrap();
        match cli.command {
            Commands::SetDefault { card_id } => assert_eq!(card_id.as_deref(), Some("card_2")),
            _ => panic!("Expected set-default"),
        }
    }

    #[test]
    fn test_rm_without_id() {
        let cli = Cli::try_parse_from(["billing", "rm"]).unwrap();
        match cli.command {
            Commands::Rm { card_id } => assert!(card_id.is_none()),
            _ => panic!("Expected rm"),
        }
    }

    #[test]
    fn test_extra_positional_rejected() {
        let err = Cli::try_parse_from(["billing", "rm", "a", "b"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);

        let err = Cli::try_parse_from(["billing", "set-default", "a", "b"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        let err = Cli::try_parse_from(["billing", "frobnicate"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from([
            "billing",
            "ls",
            "-d",
            "-t",
            "tok_cli",
            "-T",
            "acme",
            "-Q",
            "/tmp/billing-config",
        ])
        .unwrap();
        assert!(cli.debug);
        assert_eq!(cli.token.as_deref(), Some("tok_cli"));
        assert_eq!(cli.team.as_deref(), Some("acme"));
        assert_eq!(
            cli.global_config.as_deref(),
            Some(std::path::Path::new("/tmp/billing-config"))
        );
    }

    #[test]
    fn test_help_is_distinguished_from_errors() {
        let err = Cli::try_parse_from(["billing", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);

        let err = Cli::try_parse_from(["billing"]).unwrap_err();
        assert_ne!(err.kind(), ErrorKind::DisplayHelp);
    }
}
