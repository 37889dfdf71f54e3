//! Interactive add-card flow

use anyhow::Result;
use billing_core::AddCardRequest;

use crate::client::CardsClient;
use crate::format::{format_error, format_info, format_success};
use crate::prompt::Prompter;

/// Handle add command
pub async fn handle_add(client: &CardsClient, prompter: &mut dyn Prompter) -> Result<()> {
    let Some(request) = collect_card_details(prompter)? else {
        println!("{}", format_info("No changes made"));
        return Ok(());
    };

    let added = match client.add_card(&request).await {
        Ok(added) => added,
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            return Ok(());
        }
    };

    println!(
        "{}",
        format_success(&format!("Added {}", added.card.label()))
    );
    if added.default_card_id.as_deref() == Some(added.card.id.as_str()) {
        println!(
            "{}",
            format_info(&format!("{} is now the default card", added.card.label()))
        );
    }

    Ok(())
}

/// Ask for every card field in order. Card data is sent as entered; the
/// API is the authority on whether it is acceptable. Returns `None` when
/// the user backs out of a required field.
fn collect_card_details(prompter: &mut dyn Prompter) -> Result<Option<AddCardRequest>> {
    let Some(number) = prompter.input("Card number", false)? else {
        return Ok(None);
    };
    let Some(exp_month) = prompter.input("Expiration month (1-12)", false)? else {
        return Ok(None);
    };
    let Some(exp_year) = prompter.input("Expiration year (e.g. 2027)", false)? else {
        return Ok(None);
    };
    let Some(cvc) = prompter.input("CVC", false)? else {
        return Ok(None);
    };
    let Some(name) = prompter.input("Name on card", false)? else {
        return Ok(None);
    };
    let Some(address_line1) = prompter.input("Address line 1", false)? else {
        return Ok(None);
    };
    let address_line2 = prompter.input("Address line 2 (optional)", true)?;
    let Some(address_city) = prompter.input("City", false)? else {
        return Ok(None);
    };
    let address_state = prompter.input("State or province (optional)", true)?;
    let Some(address_zip) = prompter.input("Postal code", false)? else {
        return Ok(None);
    };
    let Some(address_country) = prompter.input("Country", false)? else {
        return Ok(None);
    };

    Ok(Some(AddCardRequest {
        number,
        exp_month,
        exp_year,
        cvc,
        name,
        address_line1,
        address_line2,
        address_city,
        address_state,
        address_zip,
        address_country,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ScriptedPrompter;

    #[test]
    fn test_collect_card_details() {
        let mut prompter = ScriptedPrompter::new()
            .will_input(Some("4242424242424242"))
            .will_input(Some("12"))
            .will_input(Some("2027"))
            .will_input(Some("123"))
            .will_input(Some("Jane Doe"))
            .will_input(Some("123 Main St"))
            .will_input(None) // no second address line
            .will_input(Some("San Francisco"))
            .will_input(Some("CA"))
            .will_input(Some("94107"))
            .will_input(Some("USA"));

        let request = collect_card_details(&mut prompter).unwrap().unwrap();
        assert_eq!(request.number, "4242424242424242");
        assert_eq!(request.exp_month, "12");
        assert_eq!(request.exp_year, "2027");
        assert_eq!(request.name, "Jane Doe");
        assert!(request.address_line2.is_none());
        assert_eq!(request.address_state.as_deref(), Some("CA"));
        assert_eq!(prompter.input_calls, 11);
    }

    #[test]
    fn test_backing_out_of_required_field_aborts() {
        let mut prompter = ScriptedPrompter::new().will_input(None);
        let request = collect_card_details(&mut prompter).unwrap();
        assert!(request.is_none());
        assert_eq!(prompter.input_calls, 1);
    }
}
