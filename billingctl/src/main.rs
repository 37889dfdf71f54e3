//! Billing CLI
//!
//! Command-line interface for managing the payment cards on a billing
//! account.

use clap::error::ErrorKind;
use clap::Parser;

use billing_core::Result;
use billingctl::cli::{
    generate_completion, handle_add, handle_ls, handle_rm, handle_set_default, Cli, Commands,
};
use billingctl::client::CardsClient;
use billingctl::config::CliConfig;
use billingctl::format::format_error;
use billingctl::prompt::TermPrompter;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Requested help or version succeeds; anything else is a bad
            // invocation.
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    // Completion scripts need no configuration or network access.
    if let Commands::Completion { shell } = &cli.command {
        generate_completion(*shell);
        return;
    }

    // Build configuration using priority chain:
    // defaults → global dir → local file → env → CLI args
    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            std::process::exit(1);
        }
    };

    if config.debug {
        eprintln!("Debug mode enabled");
        eprintln!("API URL: {}", config.api_url);
        eprintln!("Operating on: {}", config.scope().display_name());
        eprintln!("Timeout: {}s", config.timeout);
    }

    let client = match build_client(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            std::process::exit(1);
        }
    };

    let mut prompter = TermPrompter::new();

    let result = match cli.command {
        Commands::Ls => handle_ls(&client).await,
        Commands::SetDefault { card_id } => {
            handle_set_default(&client, &mut prompter, card_id).await
        }
        Commands::Rm { card_id } => handle_rm(&client, &mut prompter, card_id).await,
        Commands::Add => handle_add(&client, &mut prompter).await,
        // Handled before the client is built
        Commands::Completion { .. } => Ok(()),
    };

    // The session is released exactly once, whatever the outcome.
    client.close();

    if let Err(e) = result {
        eprintln!("{}", format_error(&format!("Unknown error: {}", e)));
        eprintln!("{:?}", e);
        std::process::exit(1);
    }
}

fn build_config(cli: &Cli) -> Result<CliConfig> {
    let mut builder = CliConfig::builder();

    // CLI argument overrides (highest priority)
    if let Some(token) = &cli.token {
        builder = builder.with_token(token.clone());
    }
    if let Some(team) = &cli.team {
        builder = builder.with_team(team.clone());
    }
    if cli.debug {
        builder = builder.with_debug(true);
    }

    builder
        .with_env_overrides()
        .with_local_file(cli.local_config.as_deref())?
        .with_global_dir(cli.global_config.as_deref())?
        .build()
}

fn build_client(config: &CliConfig) -> Result<CardsClient> {
    let token = config.require_token()?;
    CardsClient::new(&config.api_url, token, config.scope(), config.timeout)
}
