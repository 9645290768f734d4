//! Configuration file data structures

use serde::{Deserialize, Serialize};

use crate::rules::RuleSet;

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = ".asar-trim.toml";

/// asar-trim configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Additions to and exclusions from the built-in rule tables
    #[serde(default)]
    pub rules: RuleOverrides,
}

impl ConfigFile {
    /// Built-in rules with this file's overrides applied
    pub fn rule_set(&self) -> RuleSet {
        RuleSet::default().with_overrides(&self.rules)
    }
}

/// `[rules]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RuleOverrides {
    /// Basenames deleted wherever they appear
    pub extra_names: Vec<String>,

    /// Path suffixes whose files are deleted
    pub extra_suffixes: Vec<String>,

    /// Keys stripped from `package.json`
    pub extra_package_keys: Vec<String>,

    /// Names, suffixes or keys to remove from the rule tables
    pub keep: Vec<String>,
}

impl RuleOverrides {
    /// Whether no override is set
    pub fn is_empty(&self) -> bool {
        self.extra_names.is_empty()
            && self.extra_suffixes.is_empty()
            && self.extra_package_keys.is_empty()
            && self.keep.is_empty()
    }
}
