mod cli;
mod commands;
mod logging;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use tracing::error;
use treemirror_core::ShutdownSignal;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config =
        commands::Mirror::resolve_config(&cli).context("Failed to load configuration")?;
    logging::init(&config.log_file, cli.verbose).context("Failed to initialize logging")?;

    // First Ctrl+C stops after the current copy; a second one exits at once
    let shutdown = ShutdownSignal::new();
    let handler_signal = shutdown.clone();
    ctrlc::set_handler(move || {
        if handler_signal.is_triggered() {
            std::process::exit(130); // Standard exit code for SIGINT
        }
        handler_signal.trigger();
    })
    .context("Failed to set Ctrl+C handler")?;

    if let Err(e) = commands::Mirror::execute(&cli, &config, &shutdown) {
        error!("Synchronization failed: {e:#}");
        return Err(e).context("Failed to execute mirror command");
    }

    Ok(())
}
