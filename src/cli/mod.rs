//! CLI module
//!
//! Command-line interface for the integrations.
//!
//! # Commands
//!
//! - `resources` - List Klaviyo tags and segments for a client
//! - `sheet-columns` - Print a Google Sheet's header row
//! - `handle-columns` - Run the header-extraction handler on an event
//! - `secret` - Show which fields a secret holds

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
