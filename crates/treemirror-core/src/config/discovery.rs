//! Configuration file discovery from multiple locations

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Project config file name, searched from the current directory upwards
pub const PROJECT_CONFIG_NAME: &str = ".treemirror.toml";

/// Configuration file locations in order of precedence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFiles {
    /// Config from CLI flag (highest precedence)
    pub cli: Option<PathBuf>,
    /// Project config (.treemirror.toml)
    pub project: Option<PathBuf>,
    /// Global config in the user config directory
    pub global: Option<PathBuf>,
}

/// Config file discovery
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Discover all available configuration files
    ///
    /// # Errors
    ///
    /// Returns an error if `cli_path` is given but is not a file.
    pub fn discover(cli_path: Option<&Path>) -> Result<ConfigFiles> {
        let cli = cli_path.map(Self::require).transpose()?;

        Ok(ConfigFiles {
            cli,
            project: Self::find_file(PROJECT_CONFIG_NAME),
            global: Self::find_global_config(),
        })
    }

    /// Check that an explicitly requested config file exists
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the path is not a file.
    pub fn require(path: &Path) -> Result<PathBuf> {
        if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(Error::Config {
                path: path.to_path_buf(),
                message: "file not found".to_string(),
            })
        }
    }

    /// Find a config file in the current directory or parent directories
    fn find_file(name: &str) -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Find global config in the platform config directory
    fn find_global_config() -> Option<PathBuf> {
        let global_config = dirs::config_dir()?.join("treemirror").join("config.toml");

        global_config.is_file().then_some(global_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_without_cli_config() {
        let files = ConfigDiscovery::discover(None).unwrap();

        assert!(files.cli.is_none());
        // project and global may or may not exist depending on test environment
    }

    #[test]
    fn test_discover_cli_config() {
        let tmp = TempDir::new().unwrap();
        let cli_config = tmp.path().join("custom.toml");
        fs::write(&cli_config, "# config").unwrap();

        let files = ConfigDiscovery::discover(Some(&cli_config)).unwrap();

        assert_eq!(files.cli, Some(cli_config));
    }

    #[test]
    fn test_discover_missing_cli_config_errors() {
        let tmp = TempDir::new().unwrap();
        let cli_config = tmp.path().join("nonexistent.toml");

        let err = ConfigDiscovery::discover(Some(&cli_config)).unwrap_err();

        assert!(matches!(err, Error::Config { .. }));
    }
}
