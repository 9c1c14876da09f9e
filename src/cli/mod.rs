//! CLI command implementations
//!
//! This module contains all CLI command handlers, organized by category:
//! - `search`: Read-only commands (columns, search, unmatched)
//! - `replace`: The replace command
//! - `config`: Configuration and schema commands
//! - `util`: Shared utility functions

pub mod config;
pub mod replace;
pub mod search;
pub mod util;

// Re-export all command functions for convenient access
pub use config::{cmd_config, cmd_schema};
pub use replace::cmd_replace;
pub use search::{cmd_columns, cmd_search, cmd_unmatched};
