//! Error types for the trim pipeline

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use super::worker::WorkerError;
use crate::codec::CodecError;
use crate::decision::DecisionError;
use crate::optimizer::BackupError;
use crate::walker::WalkError;

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Locate the archive
    Discover,
    /// Copy the archive to its `.bak` sibling
    Backup,
    /// Unpack the archive in the worker thread
    Extract,
    /// Walk the extraction tree and delete or minify entries
    WalkAndDecide,
    /// Pack the extraction tree back into the archive
    Repack,
    /// Remove the extraction tree
    Cleanup,
}

impl Stage {
    /// Human-readable stage name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discover => "discover",
            Self::Backup => "backup",
            Self::Extract => "extract",
            Self::WalkAndDecide => "walk-and-decide",
            Self::Repack => "repack",
            Self::Cleanup => "cleanup",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Errors that abort a trim run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Archive does not exist
    #[error("Archive not found: {}", path.display())]
    NotFound {
        /// Expected archive path
        path: PathBuf,
    },

    /// Backup was requested and could not be made
    #[error("Backup failed: {0}")]
    BackupFailed(#[source] BackupError),

    /// Extraction failed or the worker died
    #[error("Extraction failed: {0}")]
    ExtractFailed(#[source] WorkerError),

    /// The extraction tree could not be enumerated
    #[error("Walking extracted files failed: {0}")]
    WalkFailed(#[source] WalkError),

    /// A deletion or package.json rewrite failed
    #[error("Trimming failed: {0}")]
    DecisionFailed(#[source] DecisionError),

    /// Packing the tree back into the archive failed
    #[error("Repack failed: {0}")]
    RepackFailed(#[source] CodecError),
}

impl PipelineError {
    /// Stage at which the run stopped
    pub fn stage(&self) -> Stage {
        match self {
            Self::NotFound { .. } => Stage::Discover,
            Self::BackupFailed(_) => Stage::Backup,
            Self::ExtractFailed(_) => Stage::Extract,
            Self::WalkFailed(_) | Self::DecisionFailed(_) => Stage::WalkAndDecide,
            Self::RepackFailed(_) => Stage::Repack,
        }
    }
}
