//! Command handlers for asar-trim CLI
//!
//! Each submodule handles a specific CLI command.

pub mod completions;
pub mod trim;

pub use completions::cmd_completions;
pub use trim::{cmd_trim, TrimArgs};
