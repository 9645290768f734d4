//! Trim pipeline orchestration module
//!
//! Implements the complete archive trim:
//! 1. locate `app.asar` and optionally back it up
//! 2. extract it on an isolated worker thread
//! 3. delete useless files and minify JSON in the extraction tree
//! 4. repack, optionally in the order given by a hint file
//! 5. remove the extraction tree

pub mod config;
pub mod error;
pub mod executor;
pub mod metrics;
pub mod progress;
pub mod result_formatter;
pub mod worker;

pub use config::{PipelineConfig, DEFAULT_ARCHIVE_NAME};
pub use error::{PipelineError, Stage};
pub use executor::TrimPipeline;
pub use metrics::TrimReport;
pub use result_formatter::ResultFormatter;
pub use worker::WorkerError;
