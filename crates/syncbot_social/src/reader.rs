//! Pass-scoped reads of the live guild.

use crate::DirectoryService;
use std::collections::HashSet;
use std::sync::Arc;
use syncbot_core::DirectoryState;
use syncbot_error::DirectoryResult;
use tracing::{info, instrument, warn};

/// Members fetched per pass, and the largest page Discord accepts. Guilds
/// larger than this are only partially reconciled.
pub const DEFAULT_MEMBER_LIMIT: u64 = 1000;

/// Reads members, roles and custom emoji into a `DirectoryState`.
#[derive(Clone)]
pub struct DirectoryReader {
    directory: Arc<dyn DirectoryService>,
    member_limit: u64,
}

impl DirectoryReader {
    /// Create a reader fetching at most `member_limit` members.
    pub fn new(directory: Arc<dyn DirectoryService>, member_limit: u64) -> Self {
        Self {
            directory,
            member_limit,
        }
    }

    /// Read the current guild state.
    ///
    /// # Errors
    ///
    /// Returns the first read failure; no partial state is returned.
    #[instrument(skip(self), fields(member_limit = self.member_limit))]
    pub async fn read(&self) -> DirectoryResult<DirectoryState> {
        let members = self.directory.list_members(self.member_limit).await?;
        if members.len() as u64 >= self.member_limit {
            warn!(
                limit = self.member_limit,
                "Member page limit reached, members beyond it are not reconciled"
            );
        }

        let roles = self.directory.list_roles().await?;
        let emojis = self.directory.list_emojis().await?;

        warn_duplicates("role", roles.iter().map(|role| role.name.as_str()));
        warn_duplicates("emoji", emojis.iter().map(|emoji| emoji.name.as_str()));

        info!(
            members = members.len(),
            roles = roles.len(),
            emojis = emojis.len(),
            "Read directory state"
        );

        Ok(DirectoryState {
            members,
            roles,
            emojis,
        })
    }
}

fn warn_duplicates<'a>(kind: &str, names: impl IntoIterator<Item = &'a str>) {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            warn!(kind, name, "Duplicate name in directory, only the first is reconciled");
        }
    }
}
