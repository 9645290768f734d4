//! Archive backup
//!
//! Provides [`BackupManager`] for copying an archive to a sibling `.bak` file
//! before it is extracted and repacked. A backup left by an earlier run is
//! removed first, so the backup always matches the archive as it was at the
//! start of the current run.
//!
//! # Examples
//!
//! ```no_run
//! # use asar_trim::optimizer::BackupManager;
//! # use std::path::Path;
//! let manager = BackupManager::new();
//! let backup_path = manager.create_backup(Path::new("resources/app.asar"))?;
//! assert!(backup_path.ends_with("app.asar.bak"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::infra::{FileSystem, RealFileSystem};
use log::debug;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Suffix appended to the archive file name
pub const BACKUP_SUFFIX: &str = ".bak";

/// Errors that can occur during backup operations
#[derive(Error, Debug)]
pub enum BackupError {
    /// Source path has no file name component
    #[error("Invalid source filename: {0}")]
    InvalidSource(PathBuf),

    /// A previous backup exists and could not be removed
    #[error("Failed to remove previous backup {path}: {source}")]
    RemoveStale {
        /// Previous backup path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Failed to copy file
    #[error("Failed to copy file {path}: {source}")]
    CopyFile {
        /// File being backed up
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Manages the sibling backup of an archive
#[derive(Debug, Clone, Default)]
pub struct BackupManager<FS: FileSystem = RealFileSystem> {
    fs: FS,
}

impl BackupManager<RealFileSystem> {
    /// Create a new BackupManager on the real filesystem
    pub fn new() -> Self {
        Self::with_fs(RealFileSystem)
    }
}

impl<FS: FileSystem> BackupManager<FS> {
    /// Create a new BackupManager with a custom filesystem implementation
    pub fn with_fs(fs: FS) -> Self {
        Self { fs }
    }

    /// Backup path for `source`: the same path with `.bak` appended
    pub fn backup_path(source: &Path) -> Result<PathBuf, BackupError> {
        let filename = source
            .file_name()
            .ok_or_else(|| BackupError::InvalidSource(source.to_path_buf()))?;

        let mut backup_name = filename.to_os_string();
        backup_name.push(BACKUP_SUFFIX);
        Ok(source.with_file_name(backup_name))
    }

    /// Copy `source` to its backup path, replacing any previous backup
    ///
    /// # Returns
    /// Path to the created backup file
    ///
    /// # Errors
    /// Returns error if the old backup cannot be removed or the copy fails
    pub fn create_backup(&self, source: &Path) -> Result<PathBuf, BackupError> {
        let backup_path = Self::backup_path(source)?;

        if self.fs.exists(&backup_path) {
            debug!("Removing previous backup {}", backup_path.display());
            self.fs
                .remove_file(&backup_path)
                .map_err(|source| BackupError::RemoveStale {
                    path: backup_path.clone(),
                    source,
                })?;
        }

        let copied = self
            .fs
            .copy(source, &backup_path)
            .map_err(|e| BackupError::CopyFile {
                path: source.to_path_buf(),
                source: e,
            })?;
        debug!("Backed up {} bytes to {}", copied, backup_path.display());

        Ok(backup_path)
    }
}
