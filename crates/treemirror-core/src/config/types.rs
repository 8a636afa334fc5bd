//! Configuration types and structures

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Default delay between lock-conflict retries, in seconds
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 60;
/// Default idle time between scheduler checks, in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
/// Default log file, relative to the working directory
pub const DEFAULT_LOG_FILE: &str = "treemirror.log";

/// Settings as written in a single TOML file; unset keys are `None`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Seconds to wait before retrying a locked file
    pub retry_delay_secs: Option<u64>,

    /// Milliseconds the scheduler idles between checks
    pub poll_interval_ms: Option<u64>,

    /// Persistent log file path
    pub log_file: Option<PathBuf>,

    /// Run a pass at startup instead of waiting one period
    pub immediate: Option<bool>,
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Seconds to wait before retrying a locked file
    pub retry_delay_secs: u64,
    /// Milliseconds the scheduler idles between checks
    pub poll_interval_ms: u64,
    /// Persistent log file path
    pub log_file: PathBuf,
    /// Run a pass at startup instead of waiting one period
    pub immediate: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            retry_delay_secs: DEFAULT_RETRY_DELAY_SECS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            immediate: false,
        }
    }
}

impl Config {
    /// Overlay every key set in `file`
    pub fn apply(&mut self, file: ConfigFile) {
        if let Some(secs) = file.retry_delay_secs {
            self.retry_delay_secs = secs;
        }
        if let Some(ms) = file.poll_interval_ms {
            self.poll_interval_ms = ms;
        }
        if let Some(path) = file.log_file {
            self.log_file = path;
        }
        if let Some(immediate) = file.immediate {
            self.immediate = immediate;
        }
    }

    /// Delay between lock-conflict retries
    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    /// Idle time between scheduler checks
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.retry_delay(), Duration::from_secs(60));
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.log_file, PathBuf::from("treemirror.log"));
        assert!(!config.immediate);
    }

    #[test]
    fn test_apply_overrides_only_set_keys() {
        let mut config = Config::default();
        config.apply(ConfigFile {
            retry_delay_secs: Some(5),
            ..ConfigFile::default()
        });

        assert_eq!(config.retry_delay_secs, 5);
        assert_eq!(config.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
    }

    #[test]
    fn test_parse_config_file() {
        let file: ConfigFile = toml::from_str(
            r#"
            retry_delay_secs = 30
            log_file = "/var/log/mirror.log"
            "#,
        )
        .unwrap();

        assert_eq!(file.retry_delay_secs, Some(30));
        assert_eq!(file.log_file, Some(PathBuf::from("/var/log/mirror.log")));
        assert_eq!(file.immediate, None);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(toml::from_str::<ConfigFile>("retry_dleay_secs = 3").is_err());
    }
}
