//! Syncbot binary.
//!
//! Keeps a Discord guild's nicknames, roles and custom emoji in line with the
//! desired snapshot published to Redis:
//! - `run` (default) reconciles on a fixed interval until interrupted
//! - `once` runs a single pass
//! - `plan` prints what a pass would change without changing anything
//! - `members` and `roles` dump the live guild

use clap::Parser;
use syncbot_bot::SyncbotConfig;
use syncbot_core::{init_tracing, shutdown_tracing};
use tracing::debug;

mod cli;
mod shutdown;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{
        Cli, Commands, Environment, list_members, list_roles, plan_once, run_loop, run_once,
    };

    let cli = Cli::parse();

    // A missing .env file is fine; the variables may already be set
    let _ = dotenvy::dotenv();

    let config = SyncbotConfig::load(cli.config.as_deref())?;
    init_tracing(config.logging.format)?;
    debug!(
        explicit = ?cli.config,
        interval_seconds = config.interval_seconds,
        member_limit = config.member_limit,
        nickname_policy = %config.members.nickname_policy,
        "Configuration loaded"
    );

    let env = Environment::from_env()?;

    let result = match cli.command.unwrap_or_default() {
        Commands::Run => run_loop(&config, &env).await,
        Commands::Once => run_once(&config, &env).await,
        Commands::Plan => plan_once(&config, &env).await,
        Commands::Members => list_members(&config, &env).await,
        Commands::Roles => list_roles(&config, &env).await,
    };

    shutdown_tracing();
    Ok(result?)
}
