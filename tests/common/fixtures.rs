//! Test fixture helpers for creating Electron resources directories
//!
//! Every fixture lays out an application tree on disk and packs it into a
//! real `app.asar` with the library codec, so tests exercise the same
//! archive format the CLI reads in production.

#![allow(dead_code)]

use asar_trim::codec::{ArchiveCodec, AsarCodec, PackOptions};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Re-export anyhow for convenience
pub use anyhow;

/// A resources directory holding one packed archive
///
/// The TempDir must be kept alive for the duration of the test.
pub struct ResourcesFixture {
    dir: TempDir,
    archive_name: String,
}

impl ResourcesFixture {
    /// Pack `files` (relative path, contents) into `<tmp>/app.asar`
    pub fn with_files(files: &[(&str, &[u8])]) -> anyhow::Result<Self> {
        Self::with_archive_name("app.asar", files)
    }

    /// Pack `files` into an archive called `archive_name`
    pub fn with_archive_name(archive_name: &str, files: &[(&str, &[u8])]) -> anyhow::Result<Self> {
        let dir = TempDir::new()?;
        let source = TempDir::new()?;
        write_tree(source.path(), files)?;

        AsarCodec::new().pack(
            source.path(),
            &dir.path().join(archive_name),
            &PackOptions::default(),
        )?;

        Ok(Self {
            dir,
            archive_name: archive_name.to_string(),
        })
    }

    /// The tree used by most end-to-end tests
    ///
    /// Contains two deletable files (`README.md`, `node_modules/foo/LICENSE`),
    /// one minifiable JSON file and a `package.json` carrying metadata keys.
    pub fn sample() -> anyhow::Result<Self> {
        Self::with_files(SAMPLE_FILES)
    }

    /// Resources directory (the value passed to `--path`)
    pub fn resources_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Full path of the archive
    pub fn archive(&self) -> PathBuf {
        self.dir.path().join(&self.archive_name)
    }

    /// Write a file next to the archive, such as a config or hint file
    pub fn write_sibling(&self, name: &str, contents: &str) -> anyhow::Result<PathBuf> {
        let path = self.dir.path().join(name);
        fs::write(&path, contents)?;
        Ok(path)
    }
}

/// Files packed by [`ResourcesFixture::sample`]
pub const SAMPLE_FILES: &[(&str, &[u8])] = &[
    ("index.js", b"require('./lib/util');\n"),
    ("lib/util.js", b"module.exports = {};\n"),
    ("README.md", b"# My app\n\nSome documentation.\n"),
    ("node_modules/foo/LICENSE", b"MIT License\n"),
    ("node_modules/foo/index.js", b"module.exports = 42;\n"),
    ("config/settings.json", b"{\n  \"a\": 1,\n  \"b\": [1, 2]\n}\n"),
    (
        "package.json",
        b"{\n  \"name\": \"my-app\",\n  \"main\": \"index.js\",\n  \"devDependencies\": {\n    \"electron\": \"30.0.0\"\n  },\n  \"author\": \"Jane Doe\"\n}\n",
    ),
];

/// Bytes `SAMPLE_FILES` should reclaim with the default rules
///
/// Computed from the fixture contents so the expectation tracks edits to it.
pub fn sample_expected_savings() -> i64 {
    let deleted: usize = ["README.md", "node_modules/foo/LICENSE"]
        .iter()
        .map(|p| file_len(p))
        .sum();
    let settings = file_len("config/settings.json") - r#"{"a":1,"b":[1,2]}"#.len();
    let package = file_len("package.json") - r#"{"name":"my-app","main":"index.js"}"#.len();
    (deleted + settings + package) as i64
}

fn file_len(path: &str) -> usize {
    SAMPLE_FILES
        .iter()
        .find(|(p, _)| *p == path)
        .map(|(_, c)| c.len())
        .expect("fixture file missing")
}

/// Write `files` below `root`, creating parent directories
pub fn write_tree(root: &Path, files: &[(&str, &[u8])]) -> anyhow::Result<()> {
    for (rel, contents) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
    }
    Ok(())
}
