//! Desired-state store trait.

use async_trait::async_trait;
use syncbot_error::StoreResult;

/// Read access to the desired-state store.
///
/// Implementations return the raw serialized value stored under a key.
/// A missing key is an error: a pass must never run against a partial
/// snapshot.
#[async_trait]
pub trait DesiredStateStore: Send + Sync {
    /// Fetch the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreErrorKind::Unavailable` if the store cannot be reached or
    /// the key is absent, and `StoreErrorKind::Timeout` if the read stalls.
    async fn get(&self, key: &str) -> StoreResult<String>;
}
