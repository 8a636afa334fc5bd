//! Configuration file discovery, parsing and merging
//!
//! Settings come from up to three TOML files, merged lowest precedence
//! first:
//! 1. Global config (`<config dir>/treemirror/config.toml`)
//! 2. Project config (`.treemirror.toml` in the current or a parent directory)
//! 3. Config passed with `--config`
//!
//! Command-line flags are applied on top by the caller.

mod discovery;
mod merge;
mod types;
mod validation;

pub use discovery::{ConfigDiscovery, ConfigFiles};
pub use merge::ConfigMerger;
pub use types::{Config, ConfigFile};
pub use validation::ConfigValidator;

use std::path::Path;

use crate::error::Result;

/// Configuration manager that coordinates discovery, parsing, merging, and validation
pub struct ConfigManager;

impl ConfigManager {
    /// Load and merge configuration from all sources
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit config file is missing, or if any
    /// config file is unreadable, malformed or invalid.
    pub fn load(cli_config_path: Option<&Path>) -> Result<Config> {
        let config_files = ConfigDiscovery::discover(cli_config_path)?;
        let merged = ConfigMerger::merge(&config_files)?;
        ConfigValidator::validate(&merged)?;
        Ok(merged)
    }
}
