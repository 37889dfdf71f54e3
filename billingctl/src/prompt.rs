//! Interactive prompts behind a trait so command handlers stay testable
//!
//! Handlers take `&mut dyn Prompter`; the real implementation drives
//! dialoguer on the user's terminal, tests script their own answers.

use billing_core::{BillingError, Result};
use dialoguer::{console::Term, theme::ColorfulTheme, Confirm, Input, Select};

/// One entry in a selection menu: the text shown to the user and the
/// value handed back when it is picked.
#[derive(Debug, Clone)]
pub struct SelectItem {
    pub label: String,
    pub value: String,
}

impl SelectItem {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Interactive question surface used by the command handlers.
pub trait Prompter {
    /// Single-choice menu. Returns the value of the chosen item, or
    /// `None` when the user aborts the menu (Esc / q).
    fn select(&mut self, prompt: &str, items: &[SelectItem]) -> Result<Option<String>>;

    /// Yes/no question with a default answer.
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;

    /// Free-form line of input. The answer is trimmed; an answer that
    /// trims to empty comes back as `None`. `allow_empty` lets the
    /// terminal accept an empty line outright.
    fn input(&mut self, prompt: &str, allow_empty: bool) -> Result<Option<String>>;
}

/// Terminal-backed prompter.
pub struct TermPrompter {
    theme: ColorfulTheme,
}

impl TermPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TermPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TermPrompter {
    fn select(&mut self, prompt: &str, items: &[SelectItem]) -> Result<Option<String>> {
        let labels: Vec<&str> = items.iter().map(|item| item.label.as_str()).collect();
        let choice = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(&labels)
            .default(0)
            .interact_on_opt(&Term::stderr())
            .map_err(|e| BillingError::Prompt(e.to_string()))?;
        Ok(choice.map(|index| items[index].value.clone()))
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(|e| BillingError::Prompt(e.to_string()))
    }

    fn input(&mut self, prompt: &str, allow_empty: bool) -> Result<Option<String>> {
        let answer: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(allow_empty)
            .interact_text()
            .map_err(|e| BillingError::Prompt(e.to_string()))?;
        let answer = answer.trim().to_string();
        if answer.is_empty() {
            Ok(None)
        } else {
            Ok(Some(answer))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_item_new() {
        let item = SelectItem::new("Visa ending in 4242", "card_1");
        assert_eq!(item.label, "Visa ending in 4242");
        assert_eq!(item.value, "card_1");
    }
}
