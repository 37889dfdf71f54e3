//! Output formatting utilities for the CLI
//!
//! String-in/string-out helpers with colors. Nothing here touches the
//! terminal directly; handlers print the returned strings.

use std::time::Duration;

use billing_core::Card;
use colored::*;

/// Format success message
pub fn format_success(message: &str) -> String {
    format!("{} {}", "✓".green().bold(), message)
}

/// Format error message
pub fn format_error(message: &str) -> String {
    format!("{} {}", "✗".red().bold(), message)
}

/// Format warning message
pub fn format_warning(message: &str) -> String {
    format!("{} {}", "!".yellow().bold(), message)
}

/// Format informational message
pub fn format_info(message: &str) -> String {
    format!("{} {}", "ℹ".blue().bold(), message)
}

/// Indent every non-empty line of `text` by `spaces` spaces.
pub fn indent(text: &str, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                line.to_string()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format an elapsed duration, e.g. "[245ms]" or "[1.3s]".
pub fn format_elapsed(elapsed: Duration) -> String {
    let text = if elapsed.as_secs() >= 1 {
        format!("[{:.1}s]", elapsed.as_secs_f64())
    } else {
        format!("[{}ms]", elapsed.as_millis())
    };
    text.dimmed().to_string()
}

/// Pluralized count header naming the owning team or user.
pub fn format_card_count(count: usize, owner: &str) -> String {
    match count {
        0 => format!("No cards found under {}", owner.bold()),
        1 => format!("1 card found under {}", owner.bold()),
        n => format!("{} cards found under {}", n, owner.bold()),
    }
}

/// Render one card as a display block: id line with a default marker,
/// then indented brand + masked number, cardholder name, and address.
pub fn format_card(card: &Card, is_default: bool) -> String {
    let mut header = card.id.bold().to_string();
    if is_default {
        header.push(' ');
        header.push_str(&"(default)".cyan().to_string());
    }

    let mut body = format!("{} {}\n{}", card.brand, card.masked_number(), card.name);
    for line in card.address_lines() {
        body.push('\n');
        body.push_str(&line);
    }

    format!("{}\n{}", header, indent(&body, 2))
}

/// Render one card as an interactive choice label. Plain text: the prompt
/// theme owns the styling of selected items.
pub fn format_card_choice(card: &Card, is_default: bool) -> String {
    let marker = if is_default { " (default)" } else { "" };
    format!(
        "{}{}\n    {}, {} {}",
        card.id,
        marker,
        card.name,
        card.brand,
        card.masked_number()
    )
}
