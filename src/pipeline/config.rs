//! Pipeline configuration types

use std::path::{Path, PathBuf};

use crate::rules::RuleSet;

/// Archive file name used when none is given
pub const DEFAULT_ARCHIVE_NAME: &str = "app.asar";

/// Settings for one trim run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Directory holding the archive (an Electron `resources` directory)
    pub resources_dir: PathBuf,
    /// Archive file name inside `resources_dir`
    pub archive_name: String,
    /// Optional file-ordering hint passed to the packer
    pub hint_file: Option<PathBuf>,
    /// Copy the archive to `<archive>.bak` before touching it
    pub backup: bool,
    /// Leave the extraction directory in place after repacking
    pub keep_extracted: bool,
    /// Deletion and minification rules
    pub rules: RuleSet,
    /// Draw a spinner per stage on stderr
    pub show_progress: bool,
}

impl PipelineConfig {
    /// Defaults for the archive in `resources_dir`
    pub fn new(resources_dir: impl Into<PathBuf>) -> Self {
        Self {
            resources_dir: resources_dir.into(),
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
            hint_file: None,
            backup: false,
            keep_extracted: false,
            rules: RuleSet::default(),
            show_progress: false,
        }
    }

    /// Full path of the archive
    pub fn archive_path(&self) -> PathBuf {
        self.resources_dir.join(&self.archive_name)
    }

    /// Directory the archive is extracted into: the archive name without extension
    ///
    /// `app.asar` extracts to `<resources>/app`. A name without an extension
    /// gets `.extracted` appended so the directory never collides with the archive.
    pub fn extraction_dir(&self) -> PathBuf {
        let name = Path::new(&self.archive_name);
        match (name.file_stem(), name.extension()) {
            (Some(stem), Some(_)) => self.resources_dir.join(stem),
            _ => self
                .resources_dir
                .join(format!("{}.extracted", self.archive_name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_archive_and_flags() {
        let config = PipelineConfig::new("/opt/app/resources");
        assert_eq!(config.archive_name, "app.asar");
        assert!(config.hint_file.is_none());
        assert!(!config.backup);
        assert!(!config.keep_extracted);
        assert_eq!(config.rules, RuleSet::default());
    }

    #[test]
    fn test_paths_are_siblings_in_resources_dir() {
        let config = PipelineConfig::new("/opt/app/resources");
        assert_eq!(
            config.archive_path(),
            PathBuf::from("/opt/app/resources/app.asar")
        );
        assert_eq!(
            config.extraction_dir(),
            PathBuf::from("/opt/app/resources/app")
        );
    }

    #[test]
    fn test_extraction_dir_follows_custom_archive_name() {
        let config = PipelineConfig {
            archive_name: "core.asar".to_string(),
            ..PipelineConfig::new("/r")
        };
        assert_eq!(config.extraction_dir(), PathBuf::from("/r/core"));
    }

    #[test]
    fn test_extraction_dir_for_name_without_extension() {
        let config = PipelineConfig {
            archive_name: "bundle".to_string(),
            ..PipelineConfig::new("/r")
        };
        assert_eq!(config.extraction_dir(), PathBuf::from("/r/bundle.extracted"));
    }
}
