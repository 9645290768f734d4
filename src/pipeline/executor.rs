//! Trim pipeline executor
//!
//! Runs the stages strictly in order:
//! 1. Discover the archive
//! 2. Back it up (optional)
//! 3. Extract it on an isolated worker thread
//! 4. Walk the extraction tree, deleting and minifying entries
//! 5. Repack, honoring an ordering hint when one exists
//! 6. Remove the extraction tree (unless asked to keep it)

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::codec::{ArchiveCodec, AsarCodec, PackOptions};
use crate::decision::{Decision, DecisionEngine, SavingsAccumulator};
use crate::fmt::format_signed_bytes;
use crate::infra::{FileSystem, RealFileSystem};
use crate::optimizer::BackupManager;
use crate::walker::DirectoryWalker;

use super::config::PipelineConfig;
use super::error::{PipelineError, Stage};
use super::metrics::TrimReport;
use super::progress::StageProgress;
use super::worker::{extract_isolated, WorkerError};

/// Runs one trim over an archive
///
/// # Examples
///
/// ```no_run
/// use asar_trim::pipeline::{PipelineConfig, TrimPipeline};
///
/// let mut config = PipelineConfig::new("/opt/MyApp/resources");
/// config.backup = true;
///
/// let report = TrimPipeline::new(config).run()?;
/// println!("saved {} bytes", report.bytes_saved);
/// # Ok::<(), asar_trim::pipeline::PipelineError>(())
/// ```
pub struct TrimPipeline<C = AsarCodec, FS = RealFileSystem>
where
    C: ArchiveCodec + Clone + Send + 'static,
    FS: FileSystem + Clone,
{
    config: PipelineConfig,
    codec: C,
    fs: FS,
    progress: StageProgress,
}

impl TrimPipeline {
    /// Create a pipeline using the asar codec on the real filesystem
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_parts(config, AsarCodec::new(), RealFileSystem)
    }
}

impl<C, FS> TrimPipeline<C, FS>
where
    C: ArchiveCodec + Clone + Send + 'static,
    FS: FileSystem + Clone,
{
    /// Create a pipeline with a custom codec and filesystem implementation
    pub fn with_parts(config: PipelineConfig, codec: C, fs: FS) -> Self {
        let progress = StageProgress::new(config.show_progress);
        Self {
            config,
            codec,
            fs,
            progress,
        }
    }

    /// Run every stage in order
    ///
    /// # Errors
    /// Returns the first fatal stage failure. A backup made before the
    /// failure is left in place.
    pub fn run(&self) -> Result<TrimReport, PipelineError> {
        let archive = self.discover()?;
        let before = self.size_of(&archive);

        let backup = if self.config.backup {
            Some(self.backup(&archive)?)
        } else {
            None
        };

        let extracted = self.config.extraction_dir();
        self.extract(&archive, &extracted)?;
        let savings = self.walk_and_decide(&extracted)?;
        self.repack(&extracted, &archive)?;

        let kept = if self.config.keep_extracted {
            info!("Keeping extracted files in {}", extracted.display());
            Some(extracted)
        } else {
            self.cleanup(&extracted);
            None
        };

        let mut report = TrimReport::from_savings(archive, &savings, before, 0);
        report.archive_bytes_after = self.size_of(&report.archive);
        report.backup = backup;
        report.extracted = kept;

        info!(
            "Trim complete: {} reclaimed ({} deleted, {} minified, {} skipped)",
            format_signed_bytes(report.bytes_saved),
            report.files_deleted,
            report.files_minified,
            report.files_skipped
        );
        Ok(report)
    }

    fn discover(&self) -> Result<PathBuf, PipelineError> {
        let archive_path = self.config.archive_path();
        let archive = std::path::absolute(&archive_path).unwrap_or(archive_path);
        info!("[{}] {}", Stage::Discover, archive.display());

        if !self.fs.exists(&archive) {
            return Err(PipelineError::NotFound { path: archive });
        }
        Ok(archive)
    }

    fn backup(&self, archive: &Path) -> Result<PathBuf, PipelineError> {
        info!("[{}] {}", Stage::Backup, archive.display());
        let spinner = self.progress.start(Stage::Backup, "copying archive");

        match BackupManager::with_fs(self.fs.clone()).create_backup(archive) {
            Ok(path) => {
                spinner.finish_ok(&path.display().to_string());
                Ok(path)
            }
            Err(e) => {
                spinner.finish_err(&e.to_string());
                Err(PipelineError::BackupFailed(e))
            }
        }
    }

    fn extract(&self, archive: &Path, dest: &Path) -> Result<(), PipelineError> {
        info!("[{}] {} -> {}", Stage::Extract, archive.display(), dest.display());
        let spinner = self.progress.start(Stage::Extract, "unpacking archive");

        let result = self.clear_stale(dest).and_then(|()| {
            extract_isolated(
                self.codec.clone(),
                archive.to_path_buf(),
                dest.to_path_buf(),
            )
        });

        match result {
            Ok(()) => {
                spinner.finish_ok(&dest.display().to_string());
                Ok(())
            }
            Err(e) => {
                spinner.finish_err(&e.to_string());
                Err(PipelineError::ExtractFailed(e))
            }
        }
    }

    /// Leftovers from a kept earlier run would otherwise be repacked
    fn clear_stale(&self, dest: &Path) -> Result<(), WorkerError> {
        if !self.fs.exists(dest) {
            return Ok(());
        }
        debug!("Removing stale extraction directory {}", dest.display());
        self.fs
            .remove_dir_all(dest)
            .map_err(|source| WorkerError::StaleDestination {
                path: dest.to_path_buf(),
                source,
            })
    }

    fn walk_and_decide(&self, root: &Path) -> Result<SavingsAccumulator, PipelineError> {
        info!("[{}] {}", Stage::WalkAndDecide, root.display());
        let spinner = self.progress.start(Stage::WalkAndDecide, "scanning");

        let engine = DecisionEngine::with_fs(&self.config.rules, self.fs.clone());
        let mut savings = SavingsAccumulator::new();

        for entry in DirectoryWalker::new(root).entries() {
            let step = entry
                .map_err(PipelineError::WalkFailed)
                .and_then(|entry| {
                    let decision = engine
                        .decide(&entry)
                        .map_err(PipelineError::DecisionFailed)?;
                    Ok((entry, decision))
                });

            let (entry, decision) = match step {
                Ok(step) => step,
                Err(e) => {
                    spinner.finish_err(&e.to_string());
                    return Err(e);
                }
            };

            match &decision {
                Decision::Untouched => {}
                Decision::Skipped { reason } => {
                    debug!("skipped {}: {}", entry.path.display(), reason)
                }
                other => debug!("{}: {:?}", entry.path.display(), other),
            }
            savings.record(&decision);
            spinner.set_detail(&format!(
                "{} reclaimed",
                format_signed_bytes(savings.bytes_saved())
            ));
        }

        spinner.finish_ok(&format!(
            "{} deleted, {} minified",
            savings.files_deleted(),
            savings.files_minified()
        ));
        Ok(savings)
    }

    fn repack(&self, source: &Path, archive: &Path) -> Result<(), PipelineError> {
        info!("[{}] {} -> {}", Stage::Repack, source.display(), archive.display());
        let spinner = self.progress.start(Stage::Repack, "packing archive");

        let options = PackOptions {
            ordering: self.resolve_hint(),
        };

        match self.codec.pack(source, archive, &options) {
            Ok(()) => {
                spinner.finish_ok(&archive.display().to_string());
                Ok(())
            }
            Err(e) => {
                spinner.finish_err(&e.to_string());
                Err(PipelineError::RepackFailed(e))
            }
        }
    }

    fn resolve_hint(&self) -> Option<PathBuf> {
        let hint = self.config.hint_file.as_ref()?;
        if self.fs.exists(hint) {
            debug!("Ordering archive by {}", hint.display());
            Some(hint.clone())
        } else {
            warn!(
                "Hint file {} does not exist; packing without ordering",
                hint.display()
            );
            None
        }
    }

    fn cleanup(&self, dest: &Path) {
        info!("[{}] {}", Stage::Cleanup, dest.display());
        let spinner = self.progress.start(Stage::Cleanup, "removing extracted files");

        match self.fs.remove_dir_all(dest) {
            Ok(()) => spinner.finish_ok(&dest.display().to_string()),
            Err(e) => {
                warn!("Failed to remove {}: {}", dest.display(), e);
                spinner.finish_err(&e.to_string());
            }
        }
    }

    fn size_of(&self, path: &Path) -> u64 {
        self.fs
            .symlink_metadata(path)
            .map(|m| m.len())
            .unwrap_or(0)
    }
}
