//! Core data model and set reconciliation for syncbot.
//!
//! This crate holds the types every other syncbot crate passes around:
//! - desired-state records (`UserRecord`, `RoleRecord`, `EmojiRecord`)
//! - directory mirrors of the live guild (`DirectoryMember`, `DirectoryRole`, `DirectoryEmoji`)
//! - the pass-scoped snapshots built from them (`DesiredState`, `DirectoryState`)
//! - the set reconciler that splits two key sets into adds, mods and dels
//!
//! Snapshots are rebuilt at the start of every reconciliation pass and dropped
//! at its end. Nothing here is shared between passes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod directory;
mod ids;
mod reconcile;
mod records;
mod role_index;
mod telemetry;

pub use directory::{DirectoryEmoji, DirectoryMember, DirectoryRole, DirectoryState};
pub use ids::{EmojiId, RoleId, UserId};
pub use reconcile::{Reconciliation, reconcile, sorted};
pub use records::{
    DEFAULT_ROLE_COLOR, DesiredState, EmojiRecord, RoleRecord, SEND_MESSAGES, UserRecord,
};
pub use role_index::RoleIndex;
pub use telemetry::{LogFormat, init_tracing, shutdown_tracing};
