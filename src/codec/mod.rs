//! Archive container codec
//!
//! The trim pipeline only needs two operations from the archive format:
//! unpack an archive into a directory and pack a directory back into an
//! archive. [`ArchiveCodec`] is that seam; [`AsarCodec`] implements it for
//! Electron's asar format.
//!
//! ## Key Types
//!
//! - `ArchiveCodec` - extract/pack contract consumed by the pipeline
//! - `AsarCodec` - asar reader and writer
//! - `PackOptions` - optional file-ordering hint for packing
//! - `CodecError` - everything that can go wrong inside the codec

pub mod asar;
pub mod ordering;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use asar::AsarCodec;
pub use ordering::parse_ordering;

/// Errors raised by an archive codec
#[derive(Error, Debug)]
pub enum CodecError {
    /// I/O error while reading or writing archive data
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Archive header is truncated or malformed
    #[error("Invalid archive header: {0}")]
    InvalidHeader(String),

    /// Header JSON could not be parsed or produced
    #[error("Header JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An entry name would escape the destination directory
    #[error("Unsafe entry path in archive: {0}")]
    UnsafePath(String),

    /// A symbolic link points outside the directory being packed
    #[error("Link {link} points outside {root}")]
    LinkOutsideArchive {
        /// The link being packed
        link: PathBuf,
        /// Root of the packed directory
        root: PathBuf,
    },
}

impl CodecError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Options for [`ArchiveCodec::pack`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackOptions {
    /// Hint file listing the preferred file order
    pub ordering: Option<PathBuf>,
}

/// Extracts archives to directories and packs directories into archives
pub trait ArchiveCodec {
    /// Unpack `archive` into `dest`, creating `dest` if needed
    fn extract(&self, archive: &Path, dest: &Path) -> Result<(), CodecError>;

    /// Pack `source` into `archive`, replacing any existing file
    fn pack(&self, source: &Path, archive: &Path, options: &PackOptions)
        -> Result<(), CodecError>;
}

/// Sibling directory holding files stored outside the archive
///
/// For `resources/app.asar` this is `resources/app.asar.unpacked`.
pub fn unpacked_dir(archive: &Path) -> PathBuf {
    let mut name = archive.as_os_str().to_owned();
    name.push(".unpacked");
    PathBuf::from(name)
}
