//! Snapshot loading from the desired-state store.

use crate::DesiredStateStore;
use derive_getters::Getters;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::sync::Arc;
use syncbot_core::{DesiredState, EmojiRecord, RoleRecord, UserRecord};
use syncbot_error::{StoreError, StoreResult};
use tracing::{debug, info, instrument};

/// Store keys holding the three snapshot lists.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct SnapshotKeys {
    users: String,
    roles: String,
    emojis: String,
}

impl SnapshotKeys {
    /// Keys under `<prefix>:users`, `<prefix>:roles` and `<prefix>:emojis`.
    ///
    /// # Examples
    ///
    /// ```
    /// use syncbot_store::SnapshotKeys;
    ///
    /// let keys = SnapshotKeys::with_prefix("syncbot");
    /// assert_eq!(keys.users(), "syncbot:users");
    /// assert_eq!(keys.emojis(), "syncbot:emojis");
    /// ```
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            users: format!("{}:users", prefix),
            roles: format!("{}:roles", prefix),
            emojis: format!("{}:emojis", prefix),
        }
    }
}

impl Default for SnapshotKeys {
    fn default() -> Self {
        Self::with_prefix("syncbot")
    }
}

/// Materializes a `DesiredState` from the desired-state store.
///
/// All three lists must load and decode, and each must be free of duplicate
/// identity keys, or the whole load fails.
#[derive(Clone)]
pub struct SnapshotLoader {
    store: Arc<dyn DesiredStateStore>,
    keys: SnapshotKeys,
}

impl SnapshotLoader {
    /// Create a loader reading `keys` from `store`.
    pub fn new(store: Arc<dyn DesiredStateStore>, keys: SnapshotKeys) -> Self {
        Self { store, keys }
    }

    /// Load users, roles and emojis.
    ///
    /// # Errors
    ///
    /// Returns `StoreErrorKind::Unavailable` or `Timeout` if any read fails,
    /// `StoreErrorKind::MalformedSnapshot` if any list fails to decode or
    /// repeats a user id, role name or emoji name.
    #[instrument(skip(self))]
    pub async fn load(&self) -> StoreResult<DesiredState> {
        let users: Vec<UserRecord> = self.load_list(&self.keys.users).await?;
        ensure_unique(&self.keys.users, users.iter().map(|user| user.id.as_str()))?;

        let roles: Vec<RoleRecord> = self.load_list(&self.keys.roles).await?;
        ensure_unique(&self.keys.roles, roles.iter().map(|role| role.name.as_str()))?;

        let emojis: Vec<EmojiRecord> = self.load_list(&self.keys.emojis).await?;
        ensure_unique(&self.keys.emojis, emojis.iter().map(|emoji| emoji.name.as_str()))?;

        info!(
            users = users.len(),
            roles = roles.len(),
            emojis = emojis.len(),
            "Loaded desired snapshot"
        );

        Ok(DesiredState {
            users,
            roles,
            emojis,
        })
    }

    async fn load_list<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Vec<T>> {
        let raw = self.store.get(key).await?;
        debug!(key, bytes = raw.len(), "Read snapshot key");
        decode(key, &raw)
    }
}

#[track_caller]
fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> StoreResult<Vec<T>> {
    serde_json::from_str(raw).map_err(|e| StoreError::malformed(key, e.to_string()))
}

fn ensure_unique<'a>(key: &str, ids: impl IntoIterator<Item = &'a str>) -> StoreResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(StoreError::malformed(
                key,
                format!("duplicate entry '{}'", id),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_unique_rejects_repeats() {
        assert!(ensure_unique("k", ["a", "b"]).is_ok());
        let err = ensure_unique("k", ["a", "b", "a"]).unwrap_err();
        assert!(err.to_string().contains("duplicate entry 'a'"));
    }

    #[test]
    fn test_decode_reports_key() {
        let err = decode::<EmojiRecord>("syncbot:emojis", "{not json").unwrap_err();
        assert!(err.to_string().contains("syncbot:emojis"));
    }
}
