//! Common test utilities and helpers
//!
//! This module provides shared functionality for integration tests:
//! - Fixture archives packed from real directory trees
//! - Assertion helpers that look inside repacked archives
//!
//! # Usage
//!
//! ```rust,no_run
//! mod common;
//! use common::{assertions, fixtures};
//!
//! let fixture = fixtures::ResourcesFixture::sample().unwrap();
//! // ... run the trimmer against fixture.resources_dir() ...
//! assertions::assert_archive_lacks(&fixture.archive(), "README.md");
//! ```

pub mod assertions;
pub mod fixtures;

/// Entries currently in `dir`, sorted by name
#[allow(dead_code)]
pub fn dir_listing(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to read directory")
        .map(|e| {
            e.expect("Failed to read entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}
