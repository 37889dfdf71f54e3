//! Billing CLI Library
//!
//! This library provides the functionality behind the `billing` tool.
//!
//! # Public API
//!
//! The primary public API is [`client::CardsClient`] which provides
//! programmatic access to the billing API's card endpoints. Configuration
//! types are available via [`config::CliConfig`] and
//! [`config::ConfigBuilder`].
//!
//! ```no_run
//! use billing_core::Scope;
//! use billingctl::client::CardsClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = CardsClient::new(
//!     "https://api.billing.dev",
//!     "tok_secret",
//!     Scope::User("jane@example.com".to_string()),
//!     10, // timeout in seconds
//! )?;
//!
//! let cards = client.list_cards().await?;
//! println!("{} cards on file", cards.len());
//! # Ok(())
//! # }
//! ```

// Internal CLI implementation - not part of public API
#[doc(hidden)]
pub mod cli;

/// HTTP client for communicating with the billing API.
pub mod client;

/// Configuration types for the CLI tool.
pub mod config;

// Internal formatting functions - not part of public API
#[doc(hidden)]
pub mod format;

/// Interactive prompts behind a testable trait.
pub mod prompt;

// Mock server and scripted prompter used by the unit and integration tests
#[doc(hidden)]
pub mod test_utils;
