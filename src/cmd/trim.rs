//! Trim command implementation
//!
//! Thin presentation layer for the trim command.
//! Business logic lives in `pipeline::TrimPipeline`.

use anyhow::Result;
use console::style;
use log::debug;
use std::path::{Path, PathBuf};

use crate::config::{ConfigFile, ConfigLoader, CONFIG_FILE_NAME};
use crate::error::AsarTrimError;
use crate::fmt::ROCKET;
use crate::pipeline::{PipelineConfig, ResultFormatter, TrimPipeline, DEFAULT_ARCHIVE_NAME};

/// Options collected from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimArgs {
    /// Directory containing the archive
    pub path: PathBuf,
    /// Optional ordering hint file
    pub hint_file: Option<PathBuf>,
    /// Back up the archive first
    pub backup: bool,
    /// Keep the extraction directory
    pub keep_extracted: bool,
    /// Archive file name
    pub archive: String,
    /// Explicit config file
    pub config: Option<PathBuf>,
    /// Print a JSON report instead of the styled summary
    pub json: bool,
}

impl TrimArgs {
    /// Arguments for `path` with every option at its default
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            hint_file: None,
            backup: false,
            keep_extracted: false,
            archive: DEFAULT_ARCHIVE_NAME.to_string(),
            config: None,
            json: false,
        }
    }
}

/// Main trim command handler (presentation layer)
///
/// # Examples
///
/// ```no_run
/// use asar_trim::cmd::trim::{cmd_trim, TrimArgs};
///
/// let mut args = TrimArgs::new("/opt/MyApp/resources");
/// args.backup = true;
/// cmd_trim(&args)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn cmd_trim(args: &TrimArgs) -> Result<()> {
    validate_archive_name(&args.archive)?;
    let config_file = load_config(args)?;

    if !args.json {
        println!(
            "{} {} {}",
            ROCKET,
            style("asar-trim").bold(),
            style(args.path.join(&args.archive).display()).cyan()
        );
        println!();
    }

    let config = PipelineConfig {
        resources_dir: args.path.clone(),
        archive_name: args.archive.clone(),
        hint_file: args.hint_file.clone(),
        backup: args.backup,
        keep_extracted: args.keep_extracted,
        rules: config_file.rule_set(),
        show_progress: !args.json,
    };

    let report = TrimPipeline::new(config)
        .run()
        .map_err(AsarTrimError::from)?;

    if args.json {
        println!("{}", ResultFormatter::to_json(&report)?);
    } else {
        ResultFormatter::print_summary(&report);
    }

    Ok(())
}

fn validate_archive_name(name: &str) -> Result<(), AsarTrimError> {
    let is_plain = Path::new(name).file_name().and_then(|n| n.to_str()) == Some(name);
    if is_plain && name != "." && name != ".." {
        Ok(())
    } else {
        Err(AsarTrimError::InvalidArchiveName {
            name: name.to_string(),
        })
    }
}

fn load_config(args: &TrimArgs) -> Result<ConfigFile, AsarTrimError> {
    let (path, loaded) = match &args.config {
        Some(path) => (path.clone(), ConfigLoader::load_explicit(path)),
        None => (
            args.path.join(CONFIG_FILE_NAME),
            ConfigLoader::load(&args.path),
        ),
    };

    let config = loaded.map_err(|e| AsarTrimError::ConfigInvalid {
        path,
        reason: format!("{e:#}"),
    })?;
    if !config.rules.is_empty() {
        debug!("Rule overrides: {:?}", config.rules);
    }
    Ok(config)
}
