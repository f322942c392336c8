//! Desired-state records as published to the desired-state store.

use crate::UserId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Permission bit allowing a role to send messages.
pub const SEND_MESSAGES: u64 = 1 << 11;

/// Colour applied to roles whose record does not specify one.
pub const DEFAULT_ROLE_COLOR: u32 = 0xff0000;

/// Desired state of one guild member.
///
/// # Examples
///
/// ```
/// use syncbot_core::UserRecord;
///
/// let user: UserRecord = serde_json::from_str(
///     r#"{"user_id": "42", "display_name": "Comrade", "roles": ["member"]}"#,
/// ).unwrap();
/// assert_eq!(user.display_name, "Comrade");
/// assert!(user.role_names.contains("member"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Platform user id
    #[serde(rename = "user_id")]
    pub id: UserId,
    /// Nickname the member should carry
    pub display_name: String,
    /// Names of the roles the member should hold
    #[serde(rename = "roles", default)]
    pub role_names: BTreeSet<String>,
}

/// Desired state of one guild role. Roles are keyed by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    /// Role name, unique within the snapshot
    pub name: String,
    /// RGB colour
    #[serde(default = "default_color")]
    pub color: u32,
    /// Display members separately in the member list
    #[serde(default)]
    pub hoist: bool,
    /// Allow anyone to mention the role
    #[serde(rename = "mention", alias = "mentionable", default = "default_mentionable")]
    pub mentionable: bool,
    /// Permission bit set
    #[serde(default = "default_permissions")]
    pub permissions: u64,
}

impl RoleRecord {
    /// A role with the given name and default attributes.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: DEFAULT_ROLE_COLOR,
            hoist: false,
            mentionable: default_mentionable(),
            permissions: SEND_MESSAGES,
        }
    }
}

fn default_color() -> u32 {
    DEFAULT_ROLE_COLOR
}

fn default_mentionable() -> bool {
    true
}

fn default_permissions() -> u64 {
    SEND_MESSAGES
}

/// Desired custom emoji. The image is resolved from the name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmojiRecord {
    /// Emoji name, unique within the snapshot
    pub name: String,
}

impl EmojiRecord {
    /// Create an emoji record.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// The complete desired snapshot for one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredState {
    /// Desired members
    pub users: Vec<UserRecord>,
    /// Desired roles
    pub roles: Vec<RoleRecord>,
    /// Desired custom emoji
    pub emojis: Vec<EmojiRecord>,
}
