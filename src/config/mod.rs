//! Configuration for asar-trim
//!
//! This module provides:
//! - `.asar-trim.toml` config file support
//! - Rule overrides merged into the built-in [`crate::rules::RuleSet`]

pub mod file;
pub mod loader;

pub use file::{ConfigFile, RuleOverrides, CONFIG_FILE_NAME};
pub use loader::ConfigLoader;
