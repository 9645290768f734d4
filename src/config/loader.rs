//! Configuration file loading

use super::file::{ConfigFile, CONFIG_FILE_NAME};
use crate::infra::{FileSystem, RealFileSystem};
use anyhow::{Context, Result};
use std::path::Path;

/// Handles loading configuration files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config from .asar-trim.toml in the given directory
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use asar_trim::config::ConfigLoader;
    /// use std::path::Path;
    ///
    /// let config = ConfigLoader::load(Path::new("resources"))?;
    /// println!("Keeping: {:?}", config.rules.keep);
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn load(resources_dir: &Path) -> Result<ConfigFile> {
        Self::load_with_fs(resources_dir, &RealFileSystem)
    }

    /// Load config with a custom filesystem implementation
    pub fn load_with_fs<FS: FileSystem>(resources_dir: &Path, fs: &FS) -> Result<ConfigFile> {
        let config_path = resources_dir.join(CONFIG_FILE_NAME);

        let contents = match fs.read_to_string(&config_path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ConfigFile::default());
            }
            Err(e) => {
                return Err(e).context("Failed to read .asar-trim.toml");
            }
        };

        Self::parse(&contents).context("Failed to parse .asar-trim.toml")
    }

    /// Load config from an explicit path; the file must exist
    pub fn load_explicit(path: &Path) -> Result<ConfigFile> {
        Self::load_explicit_with_fs(path, &RealFileSystem)
    }

    /// Load an explicit config path with a custom filesystem implementation
    pub fn load_explicit_with_fs<FS: FileSystem>(path: &Path, fs: &FS) -> Result<ConfigFile> {
        let contents = fs
            .read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::parse(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    fn parse(contents: &str) -> Result<ConfigFile> {
        let config: ConfigFile = toml_edit::de::from_str(contents)?;
        Ok(config)
    }
}
