#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! asar-trim library
//!
//! This library provides the core functionality for shrinking Electron
//! `app.asar` archives. It can be used programmatically in addition to the
//! CLI interface.
//!
//! # Basic Example
//!
//! Checking which files the default rules remove:
//!
//! ```
//! use asar_trim::rules::RuleSet;
//!
//! let rules = RuleSet::default();
//! assert!(rules.is_literal_name("LICENSE"));
//! assert!(rules.matches_suffix("node_modules/left-pad/index.d.ts"));
//! assert!(!rules.matches_suffix("node_modules/left-pad/index.js"));
//! ```
//!
//! # Advanced Example: Trimming an Archive
//!
//! Packing a directory, then trimming the resulting archive in place:
//!
//! ```
//! use asar_trim::codec::{ArchiveCodec, AsarCodec, PackOptions};
//! use asar_trim::pipeline::{PipelineConfig, TrimPipeline};
//! use std::fs;
//! use tempfile::TempDir;
//!
//! let resources = TempDir::new().unwrap();
//! let source = TempDir::new().unwrap();
//! fs::write(source.path().join("index.js"), "console.log(1)").unwrap();
//! fs::write(source.path().join("README.md"), "# docs").unwrap();
//!
//! let archive = resources.path().join("app.asar");
//! AsarCodec::new()
//!     .pack(source.path(), &archive, &PackOptions::default())
//!     .unwrap();
//!
//! let report = TrimPipeline::new(PipelineConfig::new(resources.path()))
//!     .run()
//!     .unwrap();
//! assert_eq!(report.files_deleted, 1);
//! assert_eq!(report.bytes_saved, 6);
//! assert!(!resources.path().join("app").exists());
//! ```

/// Command handlers for CLI operations
pub mod cmd;
/// asar archive reading and writing
pub mod codec;
/// Rule configuration file loading
pub mod config;
/// Per-file delete / minify decisions
pub mod decision;
/// Enhanced error types with contextual suggestions
pub mod error;
/// Shared formatting utilities
pub mod fmt;
/// Infrastructure traits for filesystem access
pub mod infra;
/// Backup management
pub mod optimizer;
/// Trim pipeline orchestration
pub mod pipeline;
/// Deletion and minification rule tables
pub mod rules;
/// Recursive traversal of the extraction tree
pub mod walker;
