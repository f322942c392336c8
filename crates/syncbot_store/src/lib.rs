//! Desired-state store access for syncbot.
//!
//! The desired-state store is a key-value cache holding the target guild
//! configuration as three JSON lists (users, roles, emojis). This crate
//! provides:
//! - `DesiredStateStore` - trait over raw key reads
//! - `RedisStore` - Redis-backed implementation
//! - `MemoryStore` - in-process implementation for tests and dry runs
//! - `SnapshotLoader` - reads all three keys and materializes a `DesiredState`

#![warn(missing_docs)]

mod memory;
mod redis_store;
mod snapshot;
mod store;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use snapshot::{SnapshotKeys, SnapshotLoader};
pub use store::DesiredStateStore;
