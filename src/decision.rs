//! Per-entry delete / minify decisions
//!
//! For every walked entry, in order:
//! 1. lower-cased basename in the literal-name table: delete
//! 2. lower-cased full path ends with a deletable suffix (files only): delete
//! 3. basename is `package.json`: strip metadata keys and minify
//! 4. basename ends in `.json`/`.json5`: minify, best effort
//! 5. anything else is left alone
//!
//! Failures on step 4 are swallowed and reported as [`Decision::Skipped`].
//! Failures on steps 1-3 are returned as [`DecisionError`] and abort the run.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::infra::{FileSystem, RealFileSystem};
use crate::rules::{is_json_basename, RuleSet, PACKAGE_METADATA_FILE};
use crate::walker::WalkedEntry;

/// Errors from parsing or re-serializing a JSON file
#[derive(Error, Debug)]
pub enum MinifyError {
    /// Reading or writing the file failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Contents are not valid relaxed JSON
    #[error("Invalid JSON: {0}")]
    Parse(#[from] json5::Error),

    /// Value could not be serialized back to JSON
    #[error("Failed to serialize JSON: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Fatal errors raised while acting on an entry
#[derive(Error, Debug)]
pub enum DecisionError {
    /// A file matched a deletion rule but could not be removed
    #[error("Failed to delete {path}: {source}")]
    Delete {
        /// File that could not be deleted
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// `package.json` could not be read, parsed or rewritten
    #[error("Failed to minify package metadata {path}: {source}")]
    PackageMetadata {
        /// Path of the package.json file
        path: PathBuf,
        /// Underlying minification error
        #[source]
        source: MinifyError,
    },
}

/// Which deletion rule matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteRule {
    /// Basename is in the literal-name table
    LiteralName,
    /// Full path ends with a deletable suffix
    Suffix,
}

/// Which minification path applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinifyKind {
    /// `package.json` with metadata keys stripped
    PackageMetadata,
    /// Any other JSON-family file
    Json,
}

/// Outcome of a best-effort minification attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MinifyOutcome {
    /// File was rewritten; sizes are UTF-8 byte lengths
    Minified {
        /// Size before rewriting
        before: u64,
        /// Size after rewriting
        after: u64,
    },
    /// File was left as extracted
    Skipped(String),
}

/// What the engine did with one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Entry was deleted; `bytes` is its size before deletion
    Deleted {
        /// Matching rule
        rule: DeleteRule,
        /// Bytes reclaimed
        bytes: u64,
    },
    /// Entry was rewritten as compact JSON
    Minified {
        /// Minification path
        kind: MinifyKind,
        /// `before - after`; negative when the rewrite grew the file
        delta: i64,
    },
    /// A JSON file could not be minified and was left untouched
    Skipped {
        /// Human-readable cause
        reason: String,
    },
    /// Entry disappeared between being walked and being acted on
    Vanished,
    /// No rule applied
    Untouched,
}

/// Running total of bytes reclaimed during one trim run
///
/// Deleted files add their size; minified files add their byte delta,
/// which may be negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SavingsAccumulator {
    bytes_saved: i64,
    files_deleted: usize,
    files_minified: usize,
    files_skipped: usize,
}

impl SavingsAccumulator {
    /// Fresh accumulator at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one decision into the totals
    pub fn record(&mut self, decision: &Decision) {
        match decision {
            Decision::Deleted { bytes, .. } => {
                self.bytes_saved = self
                    .bytes_saved
                    .saturating_add(i64::try_from(*bytes).unwrap_or(i64::MAX));
                self.files_deleted += 1;
            }
            Decision::Minified { delta, .. } => {
                self.bytes_saved = self.bytes_saved.saturating_add(*delta);
                self.files_minified += 1;
            }
            Decision::Skipped { .. } => self.files_skipped += 1,
            Decision::Vanished | Decision::Untouched => {}
        }
    }

    /// Total bytes reclaimed
    pub fn bytes_saved(&self) -> i64 {
        self.bytes_saved
    }

    /// Number of deleted entries
    pub fn files_deleted(&self) -> usize {
        self.files_deleted
    }

    /// Number of rewritten JSON files
    pub fn files_minified(&self) -> usize {
        self.files_minified
    }

    /// Number of JSON files left untouched after a failed minification
    pub fn files_skipped(&self) -> usize {
        self.files_skipped
    }
}

/// Parse relaxed JSON and re-emit it as compact strict JSON
///
/// # Examples
///
/// ```
/// use asar_trim::decision::minify_json;
///
/// let out = minify_json("{ \"a\": 1, // comment\n \"b\": [1, 2,], }").unwrap();
/// assert_eq!(out, r#"{"a":1,"b":[1,2]}"#);
/// ```
pub fn minify_json(text: &str) -> Result<String, MinifyError> {
    let value: serde_json::Value = json5::from_str(text)?;
    Ok(serde_json::to_string(&value)?)
}

/// Strip every metadata key in `rules` from a package.json document
///
/// Non-object documents are minified without stripping. Remaining keys keep
/// their original order.
pub fn strip_package_metadata(text: &str, rules: &RuleSet) -> Result<String, MinifyError> {
    let mut value: serde_json::Value = json5::from_str(text)?;
    if let serde_json::Value::Object(map) = &mut value {
        map.retain(|key, _| !rules.is_package_metadata_key(key));
    }
    Ok(serde_json::to_string(&value)?)
}

fn byte_delta(before: u64, after: u64) -> i64 {
    i64::try_from(before).unwrap_or(i64::MAX) - i64::try_from(after).unwrap_or(i64::MAX)
}

/// Applies a [`RuleSet`] to walked entries
///
/// # Examples
///
/// ```no_run
/// use asar_trim::decision::{DecisionEngine, SavingsAccumulator};
/// use asar_trim::rules::RuleSet;
/// use asar_trim::walker::DirectoryWalker;
///
/// let rules = RuleSet::default();
/// let engine = DecisionEngine::new(&rules);
/// let mut savings = SavingsAccumulator::new();
///
/// for entry in DirectoryWalker::new("resources/app").entries() {
///     let decision = engine.decide(&entry?)?;
///     savings.record(&decision);
/// }
/// println!("saved {} bytes", savings.bytes_saved());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct DecisionEngine<'r, FS: FileSystem = RealFileSystem> {
    rules: &'r RuleSet,
    fs: FS,
}

impl<'r> DecisionEngine<'r, RealFileSystem> {
    /// Create an engine operating on the real filesystem
    pub fn new(rules: &'r RuleSet) -> Self {
        Self::with_fs(rules, RealFileSystem)
    }
}

impl<'r, FS: FileSystem> DecisionEngine<'r, FS> {
    /// Create an engine with a custom filesystem implementation
    pub fn with_fs(rules: &'r RuleSet, fs: FS) -> Self {
        Self { rules, fs }
    }

    /// Classify `entry` and perform the chosen action
    pub fn decide(&self, entry: &WalkedEntry) -> Result<Decision, DecisionError> {
        let basename = entry.basename();

        if self.rules.is_literal_name(&basename) {
            // Directories are never removed, even when their name matches
            if entry.is_directory {
                log::debug!("keeping directory {}", entry.path.display());
                return Ok(Decision::Untouched);
            }
            return self.delete(&entry.path, DeleteRule::LiteralName);
        }

        if !entry.is_directory && self.rules.matches_suffix(&entry.path.to_string_lossy()) {
            return self.delete(&entry.path, DeleteRule::Suffix);
        }

        if entry.is_directory || entry.is_symlink {
            return Ok(Decision::Untouched);
        }

        if basename == PACKAGE_METADATA_FILE {
            return self.minify_package_metadata(&entry.path);
        }

        if is_json_basename(&basename) {
            return Ok(match self.try_minify_json(&entry.path) {
                MinifyOutcome::Minified { before, after } => Decision::Minified {
                    kind: MinifyKind::Json,
                    delta: byte_delta(before, after),
                },
                MinifyOutcome::Skipped(reason) => {
                    log::debug!("skipped {}: {}", entry.path.display(), reason);
                    Decision::Skipped { reason }
                }
            });
        }

        Ok(Decision::Untouched)
    }

    fn delete(&self, path: &Path, rule: DeleteRule) -> Result<Decision, DecisionError> {
        let bytes = match self.fs.symlink_metadata(path) {
            Ok(metadata) => metadata.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Decision::Vanished),
            Err(source) => {
                return Err(DecisionError::Delete {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        match self.fs.remove_file(path) {
            Ok(()) => {
                log::debug!("deleted {} ({:?}, {} bytes)", path.display(), rule, bytes);
                Ok(Decision::Deleted { rule, bytes })
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Decision::Vanished),
            Err(source) => Err(DecisionError::Delete {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn minify_package_metadata(&self, path: &Path) -> Result<Decision, DecisionError> {
        let fail = |source: MinifyError| DecisionError::PackageMetadata {
            path: path.to_path_buf(),
            source,
        };

        let original = match self.fs.read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Decision::Vanished),
            Err(e) => return Err(fail(e.into())),
        };

        let stripped = strip_package_metadata(&original, self.rules).map_err(fail)?;
        self.fs
            .write(path, stripped.as_bytes())
            .map_err(|e| fail(e.into()))?;

        let delta = byte_delta(original.len() as u64, stripped.len() as u64);
        log::debug!("minified {} ({} bytes)", path.display(), delta);
        Ok(Decision::Minified {
            kind: MinifyKind::PackageMetadata,
            delta,
        })
    }

    /// Minify a JSON file in place, never failing
    ///
    /// The file is only rewritten after parsing and serialization succeed,
    /// so a malformed file is left byte-for-byte unchanged.
    pub fn try_minify_json(&self, path: &Path) -> MinifyOutcome {
        let attempt = || -> Result<(u64, u64), MinifyError> {
            let original = self.fs.read_to_string(path)?;
            let minified = minify_json(&original)?;
            self.fs.write(path, minified.as_bytes())?;
            Ok((original.len() as u64, minified.len() as u64))
        };

        match attempt() {
            Ok((before, after)) => MinifyOutcome::Minified { before, after },
            Err(e) => MinifyOutcome::Skipped(e.to_string()),
        }
    }
}
