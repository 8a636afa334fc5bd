//! Configuration merging with precedence rules
//!
//! Each key takes the value from the highest-precedence file that sets it.
//! Keys no file sets keep their built-in defaults.

use std::fs;
use std::path::Path;

use super::discovery::ConfigFiles;
use super::types::{Config, ConfigFile};
use crate::error::{Error, Result};

/// Configuration merger
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge config files with precedence rules
    ///
    /// Precedence order (highest to lowest):
    /// 1. CLI config
    /// 2. Project config
    /// 3. Global config
    ///
    /// # Errors
    ///
    /// Returns an error if config files cannot be read or parsed.
    pub fn merge(files: &ConfigFiles) -> Result<Config> {
        let mut merged = Config::default();

        // Lowest precedence first so later files win
        for path in [&files.global, &files.project, &files.cli].into_iter().flatten() {
            merged.apply(Self::parse(path)?);
        }

        Ok(merged)
    }

    /// Read and parse a single config file
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn parse(path: &Path) -> Result<ConfigFile> {
        let content = fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_merge_no_files() {
        let merged = ConfigMerger::merge(&ConfigFiles::default()).unwrap();

        assert_eq!(merged, Config::default());
    }

    #[test]
    fn test_merge_precedence() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = tmp.path().join("project.toml");
        let cli = tmp.path().join("cli.toml");

        fs::write(&global, "retry_delay_secs = 10\npoll_interval_ms = 200\nimmediate = true\n")
            .unwrap();
        fs::write(&project, "retry_delay_secs = 20\nlog_file = \"project.log\"\n").unwrap();
        fs::write(&cli, "retry_delay_secs = 30\n").unwrap();

        let merged = ConfigMerger::merge(&ConfigFiles {
            cli: Some(cli),
            project: Some(project),
            global: Some(global),
        })
        .unwrap();

        assert_eq!(merged.retry_delay_secs, 30);
        assert_eq!(merged.poll_interval_ms, 200);
        assert_eq!(merged.log_file, PathBuf::from("project.log"));
        assert!(merged.immediate);
    }

    #[test]
    fn test_merge_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        let cli = tmp.path().join("bad.toml");
        fs::write(&cli, "retry_delay_secs = \"soon\"").unwrap();

        let err = ConfigMerger::merge(&ConfigFiles {
            cli: Some(cli),
            ..ConfigFiles::default()
        })
        .unwrap_err();

        assert!(err.to_string().contains("bad.toml"));
    }
}
