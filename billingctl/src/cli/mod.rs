//! CLI command definitions and handlers
//!
//! This module organizes the CLI into logical submodules:
//! - [`commands`] - Command and subcommand enum definitions
//! - [`handlers`] - Command execution handlers
//! - [`add`] - Interactive add-card flow

mod add;
mod commands;
mod handlers;

pub use add::*;
pub use commands::*;
pub use handlers::*;
