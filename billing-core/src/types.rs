//! Core types and data structures for the billing CLI

use serde::{Deserialize, Serialize};

/// A credit card as stored on the billing account.
///
/// Card entities are fetched on demand and never cached across subcommand
/// invocations; they represent server-side state at the time of the fetch.
/// Address fields follow the legacy card-entry naming used on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique card identifier
    pub id: String,
    /// Card brand ("Visa", "Mastercard", ...)
    pub brand: String,
    /// Last four digits of the card number
    pub last4: String,
    /// Cardholder name
    pub name: String,
    /// Street address, first line
    pub address_line1: String,
    /// Street address, second line (if any)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    /// City
    pub address_city: String,
    /// State or province (if any)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_state: Option<String>,
    /// Postal code
    pub address_zip: String,
    /// Country
    pub address_country: String,
}

impl Card {
    /// Masked card number showing only the last four digits.
    pub fn masked_number(&self) -> String {
        format!("**** **** **** {}", self.last4)
    }

    /// Short human-readable label, e.g. "Visa ending in 4242".
    pub fn label(&self) -> String {
        format!("{} ending in {}", self.brand, self.last4)
    }

    /// Postal address as display lines: street line(s), then
    /// "city, state zip", then country.
    pub fn address_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(4);
        lines.push(self.address_line1.clone());
        if let Some(line2) = &self.address_line2 {
            lines.push(line2.clone());
        }

        let mut region = self.address_city.clone();
        if let Some(state) = &self.address_state {
            region.push_str(", ");
            region.push_str(state);
        }
        region.push(' ');
        region.push_str(&self.address_zip);
        lines.push(region);

        lines.push(self.address_country.clone());
        lines
    }
}

/// The set of cards on an account, plus which one (if any) is the default.
///
/// Invariant: if `default_card_id` is set, exactly one card carries that id.
/// A collection is fetched fresh at the start of every subcommand that needs
/// it and discarded when the subcommand finishes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardCollection {
    /// All cards on the account
    pub cards: Vec<Card>,
    /// Id of the default card, if one is set
    pub default_card_id: Option<String>,
}

impl CardCollection {
    /// Whether the account has no cards at all.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of cards on the account.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Look up a card by id.
    pub fn find(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    /// The default card, if a default is set and present in the collection.
    pub fn default_card(&self) -> Option<&Card> {
        self.default_card_id
            .as_deref()
            .and_then(|id| self.find(id))
    }

    /// Whether the given id is the current default.
    pub fn is_default(&self, id: &str) -> bool {
        self.default_card_id.as_deref() == Some(id)
    }

    /// Validate the default-card invariant: a set `default_card_id` must
    /// match exactly one card.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(default_id) = &self.default_card_id {
            let matches = self
                .cards
                .iter()
                .filter(|card| &card.id == default_id)
                .count();
            if matches != 1 {
                return Err(format!(
                    "default card id {} matches {} cards, expected exactly 1",
                    default_id, matches
                ));
            }
        }
        Ok(())
    }
}

/// Whose cards a command operates on: a team or a personal account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// A team, identified by its slug
    Team(String),
    /// A personal account, identified by username
    User(String),
}

impl Scope {
    /// Name used in count headers, e.g. "2 cards found under acme".
    pub fn display_name(&self) -> &str {
        match self {
            Scope::Team(slug) => slug,
            Scope::User(username) => username,
        }
    }
}
