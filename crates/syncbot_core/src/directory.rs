//! Mirrors of the live guild as read from the directory service.

use crate::{EmojiId, RoleId, RoleIndex, UserId};
use serde::{Deserialize, Serialize};

/// A guild member as the platform currently reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryMember {
    /// Platform user id
    pub id: UserId,
    /// Account username
    pub username: String,
    /// Guild nickname, if one is set
    pub nickname: Option<String>,
    /// Roles currently assigned
    pub role_ids: Vec<RoleId>,
}

impl DirectoryMember {
    /// Effective display name: the nickname if set, else the username.
    ///
    /// # Examples
    ///
    /// ```
    /// use syncbot_core::{DirectoryMember, UserId};
    ///
    /// let mut member = DirectoryMember {
    ///     id: UserId::new("1"),
    ///     username: "mao".to_string(),
    ///     nickname: None,
    ///     role_ids: vec![],
    /// };
    /// assert_eq!(member.display_name(), "mao");
    ///
    /// member.nickname = Some("Chairman".to_string());
    /// assert_eq!(member.display_name(), "Chairman");
    /// ```
    pub fn display_name(&self) -> &str {
        match self.nickname.as_deref() {
            Some(nick) if !nick.is_empty() => nick,
            _ => &self.username,
        }
    }
}

/// A guild role as the platform currently reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryRole {
    /// Platform role id
    pub id: RoleId,
    /// Role name
    pub name: String,
    /// RGB colour
    pub color: u32,
    /// Displayed separately in the member list
    pub hoist: bool,
    /// Mentionable by anyone
    pub mentionable: bool,
    /// Permission bit set
    pub permissions: u64,
    /// Owned by an integration or bot; cannot be edited or assigned by hand
    pub managed: bool,
}

/// A custom emoji as the platform currently reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEmoji {
    /// Platform emoji id
    pub id: EmojiId,
    /// Emoji name
    pub name: String,
}

/// Current guild state read at the start of a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryState {
    /// Members, up to the configured page limit
    pub members: Vec<DirectoryMember>,
    /// All roles
    pub roles: Vec<DirectoryRole>,
    /// All custom emoji
    pub emojis: Vec<DirectoryEmoji>,
}

impl DirectoryState {
    /// Build the id/name index over the current roles.
    pub fn role_index(&self) -> RoleIndex {
        RoleIndex::new(&self.roles)
    }

    /// Find a member by user id.
    pub fn member(&self, id: &UserId) -> Option<&DirectoryMember> {
        self.members.iter().find(|member| &member.id == id)
    }
}
