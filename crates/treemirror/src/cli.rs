use clap::Parser;
use std::path::PathBuf;

/// Synchronize two folders periodically.
///
/// Mirrors SOURCE into DESTINATION every PERIOD minutes: new and updated
/// files are copied, and anything missing from SOURCE is removed from
/// DESTINATION. Runs until interrupted with Ctrl+C.
#[derive(Parser, Debug)]
#[command(name = "treemirror")]
#[command(about, long_about, version)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Source folder path
    pub source: PathBuf,

    /// Destination folder path (created if absent)
    pub destination: PathBuf,

    /// Synchronization period in minutes
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    pub period: u64,

    /// Run a pass at startup instead of waiting one full period
    #[arg(long)]
    pub immediate: bool,

    /// Run a single pass and exit
    #[arg(long, conflicts_with = "immediate")]
    pub once: bool,

    /// Seconds to wait before retrying a file locked by another process
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub retry_delay: Option<u64>,

    /// Persistent log file (default: ./treemirror.log)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Use specific config file
    #[arg(long, value_name = "PATH", conflicts_with = "no_config")]
    pub config: Option<PathBuf>,

    /// Ignore all config files
    #[arg(long, conflicts_with = "config")]
    pub no_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positional_arguments() {
        let cli = Cli::try_parse_from(["treemirror", "/src", "/dst", "5"]).unwrap();

        assert_eq!(cli.source, PathBuf::from("/src"));
        assert_eq!(cli.destination, PathBuf::from("/dst"));
        assert_eq!(cli.period, 5);
        assert!(!cli.once);
        assert!(cli.retry_delay.is_none());
    }

    #[test]
    fn test_zero_period_rejected() {
        assert!(Cli::try_parse_from(["treemirror", "/src", "/dst", "0"]).is_err());
    }

    #[test]
    fn test_once_conflicts_with_immediate() {
        assert!(
            Cli::try_parse_from(["treemirror", "/src", "/dst", "1", "--once", "--immediate"])
                .is_err()
        );
    }
}
