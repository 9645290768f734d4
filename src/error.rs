//! User-facing errors with contextual suggestions
//!
//! Provides structured error types that include:
//! - Actionable error messages
//! - Suggested fixes and recovery actions
//! - Proper exit codes for scripts
//!
//! # Examples
//!
//! ```no_run
//! use asar_trim::error::AsarTrimError;
//! use asar_trim::pipeline::{PipelineConfig, TrimPipeline};
//!
//! match TrimPipeline::new(PipelineConfig::new("resources")).run() {
//!     Ok(report) => println!("Saved {} bytes", report.bytes_saved),
//!     Err(e) => {
//!         let err = AsarTrimError::from(e);
//!         eprintln!("{}", err);
//!         std::process::exit(err.exit_code());
//!     }
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

use crate::pipeline::PipelineError;

/// asar-trim errors with contextual suggestions
#[derive(Error, Debug)]
pub enum AsarTrimError {
    /// Configuration file missing or malformed
    #[error("Invalid configuration in {}: {reason}", path.display())]
    ConfigInvalid {
        /// Config file path
        path: PathBuf,
        /// Parser or I/O message
        reason: String,
    },

    /// Archive name is not a plain file name
    #[error("Invalid archive name: '{name}'")]
    InvalidArchiveName {
        /// Rejected name
        name: String,
    },

    /// Trim run failed
    #[error("trim failed at {stage} stage: {0}", stage = .0.stage())]
    Pipeline(#[from] PipelineError),
}

impl AsarTrimError {
    /// Get actionable suggestion for resolving this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use asar_trim::error::AsarTrimError;
    ///
    /// let error = AsarTrimError::InvalidArchiveName {
    ///     name: "../app.asar".to_string(),
    /// };
    ///
    /// assert!(error.suggestion().unwrap().contains("--path"));
    /// ```
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::ConfigInvalid { .. } => Some(
                "Config files contain a single [rules] table with extra-names, \
                 extra-suffixes, extra-package-keys and keep lists"
                    .to_string(),
            ),
            Self::InvalidArchiveName { .. } => Some(
                "Pass only the file name to --archive and the directory to --path".to_string(),
            ),
            Self::Pipeline(e) => Some(pipeline_suggestion(e)),
        }
    }

    /// Get appropriate exit code for this error.
    ///
    /// Failed trim runs exit with 1; usage and config errors follow sysexits.h.
    ///
    /// # Examples
    ///
    /// ```
    /// use asar_trim::error::AsarTrimError;
    /// use asar_trim::pipeline::PipelineError;
    /// use std::path::PathBuf;
    ///
    /// let error = AsarTrimError::from(PipelineError::NotFound {
    ///     path: PathBuf::from("app.asar"),
    /// });
    /// assert_eq!(error.exit_code(), 1);
    /// ```
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigInvalid { .. } => 65,      // EX_DATAERR
            Self::InvalidArchiveName { .. } => 64, // EX_USAGE
            Self::Pipeline(_) => 1,
        }
    }
}

fn pipeline_suggestion(error: &PipelineError) -> String {
    match error {
        PipelineError::NotFound { path } => format!(
            "Point --path at the Electron resources directory containing {}",
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "the archive".to_string())
        ),
        PipelineError::BackupFailed(_) => {
            "Check that the resources directory is writable, or run without --backup".to_string()
        }
        PipelineError::ExtractFailed(_) => {
            "The archive may be corrupt; restore it from the .bak copy if one exists".to_string()
        }
        PipelineError::WalkFailed(_) => {
            "Check permissions of the extracted directory, then run again".to_string()
        }
        PipelineError::DecisionFailed(_) => {
            "Check the file named above; list it under `keep` in .asar-trim.toml to leave it alone"
                .to_string()
        }
        PipelineError::RepackFailed(_) => {
            "The original archive was not replaced; check free disk space and permissions"
                .to_string()
        }
    }
}

/// Error formatter with colors and structured output
pub struct ErrorFormatter;

impl ErrorFormatter {
    /// Format error with its cause chain and suggestions
    pub fn format(error: &anyhow::Error) -> String {
        use console::style;

        let mut output = String::new();

        output.push_str(&format!("{} {}\n", style("error:").red().bold(), error));

        let mut source = error.source();
        let mut indent = 1;
        while let Some(err) = source {
            output.push_str(&format!(
                "{}{} {}\n",
                "  ".repeat(indent),
                style("caused by:").yellow(),
                err
            ));
            source = err.source();
            indent += 1;
        }

        if let Some(trim_error) = error.downcast_ref::<AsarTrimError>() {
            if let Some(suggestion) = trim_error.suggestion() {
                output.push_str(&format!(
                    "\n{} {}\n",
                    style("help:").cyan().bold(),
                    suggestion
                ));
            }
        }

        output
    }

    /// Get exit code from error
    pub fn exit_code(error: &anyhow::Error) -> i32 {
        if let Some(trim_error) = error.downcast_ref::<AsarTrimError>() {
            trim_error.exit_code()
        } else {
            1
        }
    }
}
