//! One reconciliation pass.
//!
//! `LoadSnapshot -> ReadDirectory -> SyncRoles -> SyncEmoji -> SyncMembers`.
//! Models are rebuilt from scratch every pass and dropped at its end. Roles
//! sync first so that member assignments can resolve roles created in the
//! same pass.

use crate::{
    AssetSource, EmojiPlan, EmojiSyncer, MemberSettings, MembershipPlan, MembershipSyncer,
    ProtectedRoles, RoleOutcome, RolePlan, RoleSettings, RoleSyncer, SyncReport, SyncbotConfig,
};
use serde::Serialize;
use std::sync::Arc;
use syncbot_core::{DesiredState, DirectoryState};
use syncbot_error::{SyncError, SyncResult};
use syncbot_social::{DirectoryReader, DirectoryService};
use syncbot_store::{DesiredStateStore, SnapshotKeys, SnapshotLoader};
use tracing::{debug, error, info, instrument};

/// Stages of a pass, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
pub enum PassStage {
    /// Read the desired snapshot
    #[display("load_snapshot")]
    LoadSnapshot,
    /// Read the live guild
    #[display("read_directory")]
    ReadDirectory,
    /// Create, edit and delete roles
    #[display("sync_roles")]
    SyncRoles,
    /// Upload and delete emoji
    #[display("sync_emoji")]
    SyncEmoji,
    /// Push nicknames and role assignments
    #[display("sync_members")]
    SyncMembers,
}

/// Per-syncer reports of a completed pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassOutcome {
    /// Role syncer report
    pub roles: SyncReport,
    /// Emoji syncer report
    pub emojis: SyncReport,
    /// Membership syncer report
    pub members: SyncReport,
}

impl PassOutcome {
    /// Sum of all three reports.
    pub fn total(&self) -> SyncReport {
        let mut total = self.roles.clone();
        total.merge(&self.emojis);
        total.merge(&self.members);
        total
    }
}

/// Everything a pass would do, computed without mutating anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassPlan {
    /// Role changes
    pub roles: RolePlan,
    /// Emoji changes
    pub emojis: EmojiPlan,
    /// Member changes, resolved against roles as they exist now
    pub members: MembershipPlan,
}

/// Wires the loader, reader and syncers into a pass.
#[derive(Clone)]
pub struct ReconciliationPass {
    loader: SnapshotLoader,
    reader: DirectoryReader,
    roles: RoleSyncer,
    emojis: EmojiSyncer,
    members: MembershipSyncer,
    role_settings: RoleSettings,
    member_settings: MemberSettings,
}

impl ReconciliationPass {
    /// Build a pass from its collaborators and configuration.
    pub fn new(
        store: Arc<dyn DesiredStateStore>,
        directory: Arc<dyn DirectoryService>,
        assets: Arc<dyn AssetSource>,
        config: &SyncbotConfig,
    ) -> Self {
        let policies = config.failure_policy;
        Self {
            loader: SnapshotLoader::new(store, SnapshotKeys::with_prefix(&config.store.key_prefix)),
            reader: DirectoryReader::new(Arc::clone(&directory), config.member_limit),
            roles: RoleSyncer::new(Arc::clone(&directory), policies.roles),
            emojis: EmojiSyncer::new(Arc::clone(&directory), assets, policies.emojis),
            members: MembershipSyncer::new(
                directory,
                policies.members,
                config.members.remove_unlisted_roles,
            ),
            role_settings: config.roles.clone(),
            member_settings: config.members.clone(),
        }
    }

    /// Run one pass to completion.
    ///
    /// # Errors
    ///
    /// Returns the error that aborted the pass: any read failure, or an item
    /// failure under an `Abort` policy.
    #[instrument(skip(self))]
    pub async fn run(&self) -> SyncResult<PassOutcome> {
        let (desired, state) = self.observe().await?;
        let protected = self.protected(&state);

        debug!(stage = %PassStage::SyncRoles, "Entering stage");
        let role_plan = RolePlan::new(&desired.roles, &state.roles, &protected);
        let RoleOutcome {
            report: roles,
            index,
        } = self
            .roles
            .apply(&role_plan, state.role_index())
            .await
            .map_err(aborted(PassStage::SyncRoles))?;

        debug!(stage = %PassStage::SyncEmoji, "Entering stage");
        let emoji_plan = EmojiPlan::new(&desired.emojis, &state.emojis);
        let emojis = self
            .emojis
            .apply(&emoji_plan)
            .await
            .map_err(aborted(PassStage::SyncEmoji))?;

        debug!(stage = %PassStage::SyncMembers, "Entering stage");
        let member_plan = MembershipPlan::new(
            &desired.users,
            &state.members,
            &index,
            &protected,
            &self.member_settings,
        );
        let members = self
            .members
            .apply(&member_plan, &index)
            .await
            .map_err(aborted(PassStage::SyncMembers))?;

        let outcome = PassOutcome {
            roles,
            emojis,
            members,
        };
        let total = outcome.total();
        info!(
            applied = total.applied,
            skipped = total.skipped,
            failed = total.failed,
            "Pass complete"
        );
        Ok(outcome)
    }

    /// Load and read, then compute what a pass would do without applying it.
    ///
    /// # Errors
    ///
    /// Returns any read failure.
    #[instrument(skip(self))]
    pub async fn plan(&self) -> SyncResult<PassPlan> {
        let (desired, state) = self.observe().await?;
        let protected = self.protected(&state);
        let index = state.role_index();

        Ok(PassPlan {
            roles: RolePlan::new(&desired.roles, &state.roles, &protected),
            emojis: EmojiPlan::new(&desired.emojis, &state.emojis),
            members: MembershipPlan::new(
                &desired.users,
                &state.members,
                &index,
                &protected,
                &self.member_settings,
            ),
        })
    }

    async fn observe(&self) -> SyncResult<(DesiredState, DirectoryState)> {
        debug!(stage = %PassStage::LoadSnapshot, "Entering stage");
        let desired = self
            .loader
            .load()
            .await
            .map_err(aborted(PassStage::LoadSnapshot))?;

        debug!(stage = %PassStage::ReadDirectory, "Entering stage");
        let state = self
            .reader
            .read()
            .await
            .map_err(aborted(PassStage::ReadDirectory))?;

        Ok((desired, state))
    }

    fn protected(&self, state: &DirectoryState) -> ProtectedRoles {
        ProtectedRoles::new(self.role_settings.protected_names(), &state.roles)
    }
}

fn aborted<E: Into<SyncError>>(stage: PassStage) -> impl FnOnce(E) -> SyncError {
    move |e| {
        let e = e.into();
        error!(stage = %stage, error = %e, "Pass aborted");
        e
    }
}
