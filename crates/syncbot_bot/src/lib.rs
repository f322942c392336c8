//! Reconciliation engine for syncbot.
//!
//! One pass loads the desired snapshot, reads the live guild and runs three
//! syncers in a fixed order:
//! - **RoleSyncer**: creates, edits and deletes guild roles by name
//! - **EmojiSyncer**: uploads missing custom emoji and deletes extras
//! - **MembershipSyncer**: pushes nicknames and role assignments per member
//!
//! `SyncServer` repeats the pass on a fixed interval until shut down.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assets;
mod config;
mod emojis;
mod members;
mod metrics;
mod pass;
mod report;
mod roles;
mod server;

pub use assets::{AssetSource, FileAssetSource};
pub use config::{
    AssetSettings, FailurePolicies, FailurePolicy, LoggingSettings, MemberSettings,
    NicknamePolicy, RoleSettings, StoreSettings, SyncbotConfig,
};
pub use emojis::{EmojiPlan, EmojiSyncer};
pub use members::{MemberPlan, MembershipPlan, MembershipSyncer, RoleAssignment, clamp_nickname};
pub use metrics::{MetricsSnapshot, PassMetrics};
pub use pass::{PassOutcome, PassPlan, PassStage, ReconciliationPass};
pub use report::SyncReport;
pub use roles::{ProtectedRoles, RoleOutcome, RolePlan, RoleSyncer};
pub use server::SyncServer;
