//! Configuration validation

use super::types::Config;
use crate::error::{Error, Result};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(config: &Config) -> Result<()> {
        if config.retry_delay_secs == 0 {
            return Err(Error::InvalidConfig(
                "retry_delay_secs must be greater than zero".to_string(),
            ));
        }

        if config.poll_interval_ms == 0 {
            return Err(Error::InvalidConfig(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }

        if config.log_file.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("log_file cannot be empty".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_default_config() {
        assert!(ConfigValidator::validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_retry_delay() {
        let config = Config {
            retry_delay_secs: 0,
            ..Config::default()
        };

        let err = ConfigValidator::validate(&config).unwrap_err();
        assert!(err.to_string().contains("retry_delay_secs"));
    }

    #[test]
    fn test_zero_poll_interval() {
        let config = Config {
            poll_interval_ms: 0,
            ..Config::default()
        };

        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_empty_log_file() {
        let config = Config {
            log_file: PathBuf::new(),
            ..Config::default()
        };

        assert!(ConfigValidator::validate(&config).is_err());
    }
}
