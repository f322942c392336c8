//! Directory service access for syncbot.
//!
//! The directory service is the chat platform that holds a guild's live
//! members, roles and custom emoji. This crate provides:
//! - `DirectoryService` - platform-agnostic trait over the reads and mutations
//!   the reconciler needs
//! - `DirectoryReader` - materializes a `DirectoryState` for one pass
//!
//! # Platform Support
//!
//! Each platform is feature-gated and lives in its own submodule:
//! - `discord` - serenity-backed Discord implementation (requires `discord` feature)

#![warn(missing_docs)]

mod directory;
mod reader;

#[cfg(feature = "discord")]
mod discord;

pub use directory::DirectoryService;
pub use reader::{DEFAULT_MEMBER_LIMIT, DirectoryReader};

#[cfg(feature = "discord")]
pub use discord::{DiscordDirectory, emoji_data_uri, parse_snowflake};
