//! Outcome of a trim run

use std::path::PathBuf;

use serde::Serialize;

use crate::decision::SavingsAccumulator;

/// Summary of a successful trim run
///
/// Serialized as-is for `--json` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrimReport {
    /// Archive that was rewritten
    pub archive: PathBuf,
    /// Backup path, when a backup was made
    pub backup: Option<PathBuf>,
    /// Extraction directory, when it was kept
    pub extracted: Option<PathBuf>,
    /// Net bytes reclaimed; negative if minification grew files overall
    pub bytes_saved: i64,
    /// Entries deleted
    pub files_deleted: usize,
    /// JSON files rewritten
    pub files_minified: usize,
    /// JSON files left as extracted because they could not be minified
    pub files_skipped: usize,
    /// Archive size before the run
    pub archive_bytes_before: u64,
    /// Archive size after repacking
    pub archive_bytes_after: u64,
}

impl TrimReport {
    pub(crate) fn from_savings(
        archive: PathBuf,
        savings: &SavingsAccumulator,
        archive_bytes_before: u64,
        archive_bytes_after: u64,
    ) -> Self {
        Self {
            archive,
            backup: None,
            extracted: None,
            bytes_saved: savings.bytes_saved(),
            files_deleted: savings.files_deleted(),
            files_minified: savings.files_minified(),
            files_skipped: savings.files_skipped(),
            archive_bytes_before,
            archive_bytes_after,
        }
    }

    /// Change in archive size; positive when the archive shrank
    pub fn archive_reduction_bytes(&self) -> i64 {
        self.archive_bytes_before as i64 - self.archive_bytes_after as i64
    }

    /// Archive size change as a percentage of the original size
    pub fn archive_reduction_percent(&self) -> f64 {
        if self.archive_bytes_before == 0 {
            return 0.0;
        }
        (self.archive_reduction_bytes() as f64 / self.archive_bytes_before as f64) * 100.0
    }
}
