//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Syncbot - keeps a Discord guild in sync with a desired-state snapshot
#[derive(Parser, Debug)]
#[command(name = "syncbot")]
#[command(about = "Keeps a Discord guild in sync with a desired-state snapshot", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file layered over the defaults
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Commands {
    /// Reconcile on a fixed interval until interrupted
    #[default]
    Run,
    /// Run a single reconciliation pass
    Once,
    /// Print the changes a pass would make without applying them
    Plan,
    /// List guild members with their effective names
    Members,
    /// List guild roles with their attributes
    Roles,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_is_default() {
        let cli = Cli::parse_from(["syncbot"]);
        assert_eq!(cli.command.unwrap_or_default(), Commands::Run);
    }

    #[test]
    fn test_config_flag_is_global() {
        let cli = Cli::parse_from(["syncbot", "plan", "--config", "prod.toml"]);
        assert_eq!(cli.command, Some(Commands::Plan));
        assert_eq!(cli.config, Some(PathBuf::from("prod.toml")));
    }
}
