//! Command handlers.

use super::Environment;
use crate::shutdown;
use std::sync::Arc;
use syncbot_bot::{FileAssetSource, PassPlan, ReconciliationPass, SyncServer, SyncbotConfig};
use syncbot_error::SyncResult;
use syncbot_social::{DirectoryReader, DirectoryService, DiscordDirectory};
use syncbot_store::RedisStore;
use tracing::{info, instrument};

fn directory(config: &SyncbotConfig, env: &Environment) -> SyncResult<Arc<dyn DirectoryService>> {
    let directory =
        DiscordDirectory::new(&env.discord_token, &env.guild_id, config.call_timeout())?;
    Ok(Arc::new(directory))
}

async fn reconciliation_pass(
    config: &SyncbotConfig,
    env: &Environment,
) -> SyncResult<ReconciliationPass> {
    let store = RedisStore::connect(env.redis_host()?, config.call_timeout()).await?;
    let assets = FileAssetSource::new(&config.assets.emoji_dir);
    Ok(ReconciliationPass::new(
        Arc::new(store),
        directory(config, env)?,
        Arc::new(assets),
        config,
    ))
}

/// Reconcile on the configured interval until a termination signal.
#[instrument(skip_all, fields(guild_id = %env.guild_id))]
pub async fn run_loop(config: &SyncbotConfig, env: &Environment) -> SyncResult<()> {
    let server = SyncServer::new(reconciliation_pass(config, env).await?, config.interval());
    server.run_until(shutdown::signal()).await;
    info!("Shutdown complete");
    Ok(())
}

/// Run a single pass.
#[instrument(skip_all, fields(guild_id = %env.guild_id))]
pub async fn run_once(config: &SyncbotConfig, env: &Environment) -> SyncResult<()> {
    let server = SyncServer::new(reconciliation_pass(config, env).await?, config.interval());
    let outcome = server.run_once().await?;
    println!(
        "roles: {} applied, {} skipped, {} failed",
        outcome.roles.applied, outcome.roles.skipped, outcome.roles.failed
    );
    println!(
        "emoji: {} applied, {} skipped, {} failed",
        outcome.emojis.applied, outcome.emojis.skipped, outcome.emojis.failed
    );
    println!(
        "members: {} applied, {} skipped, {} failed",
        outcome.members.applied, outcome.members.skipped, outcome.members.failed
    );
    Ok(())
}

/// Print what a pass would change.
#[instrument(skip_all, fields(guild_id = %env.guild_id))]
pub async fn plan_once(config: &SyncbotConfig, env: &Environment) -> SyncResult<()> {
    let plan = reconciliation_pass(config, env).await?.plan().await?;
    print_plan(&plan);
    Ok(())
}

fn print_plan(plan: &PassPlan) {
    println!("Roles");
    for role in &plan.roles.create {
        println!("  + {}", role.name);
    }
    for (id, role) in &plan.roles.edit {
        println!("  ~ {} ({})", role.name, id);
    }
    for role in &plan.roles.delete {
        println!("  - {} ({})", role.name, role.id);
    }

    println!("Emoji");
    for name in &plan.emojis.upload {
        println!("  + {}", name);
    }
    for emoji in &plan.emojis.delete {
        println!("  - {} ({})", emoji.name, emoji.id);
    }

    println!("Members");
    for change in plan.members.pending() {
        println!("  {}", change.user_id);
        if let Some(nickname) = &change.nickname {
            println!("    nickname -> {}", nickname);
        }
        for name in &change.add_roles {
            println!("    + {}", name);
        }
        for role in &change.remove_roles {
            println!("    - {} (unlisted)", role.name);
        }
    }
    for user_id in &plan.members.missing {
        println!("  {} (not a member)", user_id);
    }
}

/// Print every fetched member.
#[instrument(skip_all, fields(guild_id = %env.guild_id))]
pub async fn list_members(config: &SyncbotConfig, env: &Environment) -> SyncResult<()> {
    let reader = DirectoryReader::new(directory(config, env)?, config.member_limit);
    let state = reader.read().await?;
    let index = state.role_index();

    for member in &state.members {
        let roles: Vec<&str> = member
            .role_ids
            .iter()
            .filter_map(|id| index.name_of(id))
            .collect();
        println!(
            "{}\t{}\t{}\t{}",
            member.id,
            member.username,
            member.display_name(),
            roles.join(",")
        );
    }
    Ok(())
}

/// Print every role with its attributes.
#[instrument(skip_all, fields(guild_id = %env.guild_id))]
pub async fn list_roles(config: &SyncbotConfig, env: &Environment) -> SyncResult<()> {
    let roles = directory(config, env)?.list_roles().await?;

    for role in &roles {
        println!(
            "{}\t{}\tcolor=#{:06x}\thoist={}\tmentionable={}\tpermissions={}{}",
            role.id,
            role.name,
            role.color,
            role.hoist,
            role.mentionable,
            role.permissions,
            if role.managed { "\tmanaged" } else { "" }
        );
    }
    Ok(())
}
