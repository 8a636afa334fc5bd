use tracing::{debug, info};
use treemirror_core::config::{Config, ConfigManager};
use treemirror_core::scheduler::{self, RunOptions};
use treemirror_core::{Error, ShutdownSignal};

use crate::cli::Cli;

pub struct Mirror;

impl Mirror {
    /// Merge config files and command-line flags; flags win
    pub fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
        let mut config = if cli.no_config {
            Config::default()
        } else {
            ConfigManager::load(cli.config.as_deref())?
        };

        if let Some(secs) = cli.retry_delay {
            config.retry_delay_secs = secs;
        }
        if let Some(path) = &cli.log_file {
            config.log_file.clone_from(path);
        }
        if cli.immediate {
            config.immediate = true;
        }

        Ok(config)
    }

    pub fn execute(cli: &Cli, config: &Config, shutdown: &ShutdownSignal) -> anyhow::Result<()> {
        debug!("Configuration: {config:?}");

        let options = RunOptions::new(&cli.source, &cli.destination, cli.period);

        if !cli.once {
            scheduler::run(&options, config, shutdown)?;
            return Ok(());
        }

        match scheduler::run_once(&options, config, shutdown) {
            Ok(()) => Ok(()),
            Err(Error::Cancelled) => {
                info!("Synchronization stopped by user.");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
