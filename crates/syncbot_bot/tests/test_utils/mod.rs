//! Test utilities for syncbot_bot tests.
//!
//! This module provides an in-memory guild and snapshot helpers.

pub mod mock_guild;

#[allow(unused_imports)]
pub use mock_guild::{Call, MockAssets, MockGuild, emoji, managed_role, member, role, seed_store};
