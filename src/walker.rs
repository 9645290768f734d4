//! Lazy depth-first traversal of an extraction tree
//!
//! Directories are yielded after their contents, so a consumer that deletes
//! files never sees a directory before it has finished with its children.
//! Listing order is whatever the OS returns; entries are not sorted.

use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

/// Errors raised while enumerating a directory tree
#[derive(Error, Debug)]
pub enum WalkError {
    /// A directory could not be listed or an entry could not be stat'ed
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// A single file, directory or symbolic link found during a walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedEntry {
    /// Full path of the entry
    pub path: PathBuf,
    /// Size in bytes as reported by the filesystem when walked
    pub size: u64,
    /// Whether the entry is a directory
    pub is_directory: bool,
    /// Whether the entry is a symbolic link (never followed)
    pub is_symlink: bool,
}

impl WalkedEntry {
    /// Final path component, lossily converted to UTF-8
    pub fn basename(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Walks every entry below a root directory
///
/// # Examples
///
/// ```no_run
/// use asar_trim::walker::DirectoryWalker;
///
/// let walker = DirectoryWalker::new("resources/app");
/// for entry in walker.entries() {
///     let entry = entry?;
///     println!("{} ({} bytes)", entry.path.display(), entry.size);
/// }
/// # Ok::<(), asar_trim::walker::WalkError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryWalker {
    root: PathBuf,
}

impl DirectoryWalker {
    /// Create a walker rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Start a fresh walk
    ///
    /// Each call re-reads the filesystem. The root itself is not yielded.
    /// An unreadable directory produces an `Err` item; callers are expected
    /// to stop on the first error.
    pub fn entries(&self) -> impl Iterator<Item = Result<WalkedEntry, WalkError>> {
        WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(false)
            .contents_first(true)
            .into_iter()
            .map(|item| {
                let entry = item.map_err(|e| {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
                    WalkError::Io { path, source }
                })?;

                let metadata = entry.metadata().map_err(|e| {
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("metadata unavailable"));
                    WalkError::Io {
                        path: entry.path().to_path_buf(),
                        source,
                    }
                })?;

                let file_type = entry.file_type();
                Ok(WalkedEntry {
                    path: entry.into_path(),
                    size: metadata.len(),
                    is_directory: file_type.is_dir(),
                    is_symlink: file_type.is_symlink(),
                })
            })
    }
}
