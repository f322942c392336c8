//! Redis-backed desired-state store.

use crate::DesiredStateStore;
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use std::time::Duration;
use syncbot_error::{StoreError, StoreErrorKind, StoreResult};
use tracing::{debug, info, instrument};

/// Desired-state store reading from Redis.
///
/// Holds one multiplexed connection; every read is bounded by `timeout`.
#[derive(Clone)]
pub struct RedisStore {
    connection: MultiplexedConnection,
    timeout: Duration,
}

impl RedisStore {
    /// Connect to Redis and verify the connection with `PING`.
    ///
    /// `address` may be a full `redis://` URL or a bare `host:port`.
    ///
    /// # Errors
    ///
    /// Returns `StoreErrorKind::Unavailable` if the address is invalid or the
    /// server does not answer, `StoreErrorKind::Timeout` if it answers too slowly.
    #[instrument(skip(address, timeout), fields(timeout_secs = timeout.as_secs()))]
    pub async fn connect(address: &str, timeout: Duration) -> StoreResult<Self> {
        let url = redis_url(address);
        let client = redis::Client::open(url.as_str()).map_err(unavailable)?;

        let mut connection =
            tokio::time::timeout(timeout, client.get_multiplexed_async_connection())
                .await
                .map_err(|_| timed_out("connect", timeout))?
                .map_err(unavailable)?;

        let ping = redis::cmd("PING");
        let pong: String = tokio::time::timeout(timeout, ping.query_async(&mut connection))
            .await
            .map_err(|_| timed_out("ping", timeout))?
            .map_err(unavailable)?;
        debug!(reply = %pong, "Redis answered ping");

        info!("Connected to desired-state store");
        Ok(Self {
            connection,
            timeout,
        })
    }
}

#[async_trait]
impl DesiredStateStore for RedisStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> StoreResult<String> {
        let mut connection = self.connection.clone();
        let value: Option<String> = tokio::time::timeout(self.timeout, connection.get(key))
            .await
            .map_err(|_| timed_out(&format!("get {}", key), self.timeout))?
            .map_err(unavailable)?;

        value.ok_or_else(|| {
            StoreError::new(StoreErrorKind::Unavailable(format!(
                "key '{}' not found",
                key
            )))
        })
    }
}

fn redis_url(address: &str) -> String {
    if address.contains("://") {
        address.to_string()
    } else {
        format!("redis://{}", address)
    }
}

#[track_caller]
fn unavailable(err: redis::RedisError) -> StoreError {
    StoreError::new(StoreErrorKind::Unavailable(err.to_string()))
}

#[track_caller]
fn timed_out(operation: &str, timeout: Duration) -> StoreError {
    StoreError::new(StoreErrorKind::Timeout {
        operation: operation.to_string(),
        seconds: timeout.as_secs(),
    })
}
