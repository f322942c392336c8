//! In-process desired-state store.

use crate::DesiredStateStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use syncbot_error::{StoreError, StoreErrorKind, StoreResult};

/// Desired-state store backed by a `HashMap`.
///
/// # Examples
///
/// ```
/// use syncbot_store::MemoryStore;
///
/// let store = MemoryStore::new();
/// store.set("syncbot:emojis", r#"[{"name": "wave"}]"#);
/// assert!(store.contains("syncbot:emojis"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.write().insert(key.into(), value.into());
    }

    /// Remove `key`.
    pub fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }
}

#[async_trait]
impl DesiredStateStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<String> {
        self.entries.read().get(key).cloned().ok_or_else(|| {
            StoreError::new(StoreErrorKind::Unavailable(format!(
                "key '{}' not found",
                key
            )))
        })
    }
}
