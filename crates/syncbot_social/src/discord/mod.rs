//! Discord implementation of the directory service.
//!
//! Talks to the Discord REST API through serenity's `Http` client. No gateway
//! session is opened: the reconciler polls, it never listens for events.
//!
//! # Usage
//!
//! Available with the `discord` feature.
//!
//! ```rust,ignore
//! use syncbot_social::{DirectoryReader, DiscordDirectory};
//! use std::{sync::Arc, time::Duration};
//!
//! let directory = DiscordDirectory::new(&token, "123456789012345678", Duration::from_secs(10))?;
//! let reader = DirectoryReader::new(Arc::new(directory), 1000);
//! let state = reader.read().await?;
//! ```

mod client;
mod conversions;

pub use client::DiscordDirectory;
pub use conversions::{emoji_data_uri, parse_snowflake};
