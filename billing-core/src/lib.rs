//! Billing Core Library
//!
//! Shared types, wire models, and errors for the billing CLI.
//! This crate holds everything the CLI needs to talk about cards without
//! doing any I/O itself.

pub mod api;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use api::*;
pub use error::*;
pub use types::*;
