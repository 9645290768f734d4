//! Test assertion helpers
//!
//! Inspect a packed archive by extracting it into a scratch directory, so
//! assertions hold for the archive bytes rather than any leftover
//! extraction tree.

#![allow(dead_code)]

use asar_trim::codec::{ArchiveCodec, AsarCodec};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Extract `archive` into a fresh temporary directory
///
/// The returned TempDir owns the extracted tree.
pub fn extract(archive: &Path) -> TempDir {
    let dest = TempDir::new().expect("Failed to create temp dir");
    AsarCodec::new()
        .extract(archive, dest.path())
        .unwrap_or_else(|e| panic!("Failed to extract {}: {}", archive.display(), e));
    dest
}

/// Assert that `archive` contains `rel` with exactly `expected` bytes
pub fn assert_archive_file_eq(archive: &Path, rel: &str, expected: &[u8]) {
    let dest = extract(archive);
    let path = dest.path().join(rel);
    let actual = fs::read(&path).unwrap_or_else(|_| panic!("{} missing from archive", rel));
    assert_eq!(
        actual,
        expected,
        "Archive entry {} differs:\n  actual: {}\n  expected: {}",
        rel,
        String::from_utf8_lossy(&actual),
        String::from_utf8_lossy(expected)
    );
}

/// Assert that `archive` has an entry at `rel`
pub fn assert_archive_contains(archive: &Path, rel: &str) {
    let dest = extract(archive);
    assert!(
        dest.path().join(rel).exists(),
        "Expected {} in {}",
        rel,
        archive.display()
    );
}

/// Assert that `archive` has no entry at `rel`
pub fn assert_archive_lacks(archive: &Path, rel: &str) {
    let dest = extract(archive);
    assert!(
        !dest.path().join(rel).exists(),
        "Expected {} to be removed from {}",
        rel,
        archive.display()
    );
}
