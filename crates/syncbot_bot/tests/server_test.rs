//! Tests for the polling loop.

mod test_utils;

use std::sync::Arc;
use std::time::Duration;
use syncbot_bot::{ReconciliationPass, SyncServer, SyncbotConfig};
use syncbot_core::DirectoryState;
use test_utils::{MockAssets, MockGuild, member, seed_store};

fn server(guild: &Arc<MockGuild>, store: syncbot_store::MemoryStore) -> SyncServer {
    let config = SyncbotConfig::default();
    let pass = ReconciliationPass::new(
        Arc::new(store),
        guild.clone(),
        Arc::new(MockAssets::default()),
        &config,
    );
    SyncServer::new(pass, config.interval())
}

#[tokio::test(start_paused = true)]
async fn test_loop_runs_on_interval_until_shutdown() {
    let guild = Arc::new(MockGuild::new(DirectoryState {
        members: vec![member("1", "alice", None, &[])],
        ..Default::default()
    }));
    let store = seed_store(r#"[{"user_id": "1", "display_name": "A"}]"#, "[]", "[]");
    let server = server(&guild, store);

    // Passes at 0s, 15s and 30s; shutdown lands during the third sleep.
    server
        .run_until(tokio::time::sleep(Duration::from_secs(40)))
        .await;

    assert_eq!(server.metrics().passes_run(), 3);
    assert_eq!(server.metrics().passes_failed(), 0);
    assert_eq!(guild.calls().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_failed_pass_is_retried_next_interval() {
    let guild = Arc::new(MockGuild::new(DirectoryState::default()));
    let store = seed_store("[]", "[]", "[]");
    store.remove("syncbot:users");
    let server = server(&guild, store);

    server
        .run_until(tokio::time::sleep(Duration::from_secs(20)))
        .await;

    let snapshot = server.metrics().snapshot();
    assert_eq!(snapshot.passes_run, 2);
    assert_eq!(snapshot.passes_failed, 2);
    assert_eq!(snapshot.seconds_since_success, None);
}

#[tokio::test]
async fn test_run_once_records_metrics() {
    let guild = Arc::new(MockGuild::new(DirectoryState {
        members: vec![member("1", "alice", None, &[])],
        ..Default::default()
    }));
    let store = seed_store(r#"[{"user_id": "1", "display_name": "A"}]"#, "[]", "[]");
    let server = server(&guild, store);

    let outcome = server.run_once().await.expect("pass succeeds");

    assert_eq!(outcome.members.applied, 1);
    let snapshot = server.metrics().snapshot();
    assert_eq!(snapshot.passes_run, 1);
    assert_eq!(snapshot.operations_applied, 1);
}
