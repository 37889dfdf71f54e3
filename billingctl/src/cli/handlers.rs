//! Command execution handlers
//!
//! Anticipated API failures are printed at the call site and end the
//! subcommand without becoming process errors; anything else bubbles up
//! to be reported as an unknown error.

use std::time::Instant;

use anyhow::Result;
use billing_core::CardCollection;

use crate::client::CardsClient;
use crate::format::{
    format_card, format_card_choice, format_card_count, format_elapsed, format_error, format_info,
    format_success, format_warning,
};
use crate::prompt::{Prompter, SelectItem};

use super::commands::Cli;

/// Handle ls command
pub async fn handle_ls(client: &CardsClient) -> Result<()> {
    let started = Instant::now();
    let collection = match client.list_cards().await {
        Ok(collection) => collection,
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            return Ok(());
        }
    };
    let elapsed = started.elapsed();

    println!(
        "{} {}",
        format_card_count(collection.len(), client.scope().display_name()),
        format_elapsed(elapsed)
    );

    for card in &collection.cards {
        println!();
        println!("{}", format_card(card, collection.is_default(&card.id)));
    }

    Ok(())
}

/// Handle set-default command
pub async fn handle_set_default(
    client: &CardsClient,
    prompter: &mut dyn Prompter,
    card_id: Option<String>,
) -> Result<()> {
    let (target, collection) = match resolve_target(
        client,
        prompter,
        card_id,
        "No cards to choose from. Run `billing add` to add one.",
        "Which card should future charges go to?",
    )
    .await?
    {
        Some(resolved) => resolved,
        None => return Ok(()),
    };

    let description = describe_card(&collection, &target);
    if !prompter.confirm(&format!("Set {} as the default card?", description), true)? {
        println!("{}", format_info("No changes made"));
        return Ok(());
    }

    if let Err(e) = client.set_default_card(&target).await {
        eprintln!("{}", format_error(&e.to_string()));
        return Ok(());
    }

    println!(
        "{}",
        format_success(&format!("{} is now the default card", description))
    );
    Ok(())
}

/// Handle rm command
pub async fn handle_rm(
    client: &CardsClient,
    prompter: &mut dyn Prompter,
    card_id: Option<String>,
) -> Result<()> {
    let (target, collection) = match resolve_target(
        client,
        prompter,
        card_id,
        "No cards to remove. Run `billing add` to add one.",
        "Which card should be removed?",
    )
    .await?
    {
        Some(resolved) => resolved,
        None => return Ok(()),
    };

    let description = describe_card(&collection, &target);
    if !prompter.confirm(
        &format!("Remove {} from the account?", description),
        false,
    )? {
        println!("{}", format_info("No changes made"));
        return Ok(());
    }

    // Whether the server must pick a new default is decided by the
    // collection as it stood before the deletion.
    let was_default = collection.is_default(&target);
    let others_remain = collection.len() > 1;

    if let Err(e) = client.remove_card(&target).await {
        eprintln!("{}", format_error(&e.to_string()));
        return Ok(());
    }

    println!("{}", format_success(&format!("Removed {}", description)));

    if was_default {
        if others_remain {
            // The server picks the new default; one extra fetch discovers it.
            match client.list_cards().await {
                Ok(updated) => match updated.default_card() {
                    Some(card) => println!(
                        "{}",
                        format_info(&format!("The default card is now {}", card.label()))
                    ),
                    None => println!("{}", format_warning("There is no default card anymore")),
                },
                Err(e) => eprintln!("{}", format_error(&e.to_string())),
            }
        } else {
            println!("{}", format_warning("There is no default card anymore"));
        }
    }

    Ok(())
}

/// Resolve which card a mutating subcommand acts on.
///
/// Fetches the collection, then takes the explicit id as-is or runs the
/// interactive selection. Returns `None` when there is nothing further to
/// do (fetch failed, empty account, or the user backed out of the menu);
/// a message has been printed in each of those cases.
async fn resolve_target(
    client: &CardsClient,
    prompter: &mut dyn Prompter,
    card_id: Option<String>,
    empty_message: &str,
    prompt: &str,
) -> Result<Option<(String, CardCollection)>> {
    let collection = match client.list_cards().await {
        Ok(collection) => collection,
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            return Ok(None);
        }
    };

    if collection.is_empty() {
        println!("{}", format_info(empty_message));
        return Ok(None);
    }

    let target = match card_id {
        // An explicit id is taken as-is; the server is the authority on
        // whether it names a card.
        Some(id) => id,
        None => match prompter.select(prompt, &choice_items(&collection))? {
            Some(id) => id,
            None => {
                println!("{}", format_info("No changes made"));
                return Ok(None);
            }
        },
    };

    Ok(Some((target, collection)))
}

/// Build the selection menu entries for a collection.
fn choice_items(collection: &CardCollection) -> Vec<SelectItem> {
    collection
        .cards
        .iter()
        .map(|card| {
            SelectItem::new(
                format_card_choice(card, collection.is_default(&card.id)),
                card.id.clone(),
            )
        })
        .collect()
}

/// Display description for a target id. An id that does not appear in the
/// collection (possible when supplied explicitly) falls back to the raw id.
fn describe_card(collection: &CardCollection, id: &str) -> String {
    match collection.find(id) {
        Some(card) => card.label(),
        None => id.to_string(),
    }
}

/// Generate shell completion script
pub fn generate_completion(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
