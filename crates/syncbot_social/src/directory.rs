//! Directory service trait.

use async_trait::async_trait;
use syncbot_core::{
    DirectoryEmoji, DirectoryMember, DirectoryRole, EmojiId, RoleId, RoleRecord, UserId,
};
use syncbot_error::DirectoryResult;

/// Reads and mutations against one guild on a chat platform.
///
/// Read methods fail with `DirectoryErrorKind::Unavailable` or `Timeout`;
/// mutations fail with `DirectoryErrorKind::OperationFailed` so callers can
/// treat them per item.
#[async_trait]
pub trait DirectoryService: Send + Sync {
    /// List up to `limit` members.
    async fn list_members(&self, limit: u64) -> DirectoryResult<Vec<DirectoryMember>>;

    /// List all roles, including `@everyone` and managed roles.
    async fn list_roles(&self) -> DirectoryResult<Vec<DirectoryRole>>;

    /// List all custom emoji.
    async fn list_emojis(&self) -> DirectoryResult<Vec<DirectoryEmoji>>;

    /// Set a member's guild nickname.
    async fn set_nickname(&self, user: &UserId, nickname: &str) -> DirectoryResult<()>;

    /// Assign a role to a member.
    async fn add_member_role(&self, user: &UserId, role: &RoleId) -> DirectoryResult<()>;

    /// Remove a role from a member.
    async fn remove_member_role(&self, user: &UserId, role: &RoleId) -> DirectoryResult<()>;

    /// Create a role carrying only `name`; the platform assigns defaults to
    /// everything else.
    async fn create_role(&self, name: &str) -> DirectoryResult<DirectoryRole>;

    /// Overwrite a role's name, colour, hoist, mentionable and permissions.
    async fn edit_role(&self, id: &RoleId, role: &RoleRecord) -> DirectoryResult<DirectoryRole>;

    /// Delete a role.
    async fn delete_role(&self, id: &RoleId) -> DirectoryResult<()>;

    /// Upload a custom emoji from raw PNG bytes.
    async fn create_emoji(&self, name: &str, image: &[u8]) -> DirectoryResult<DirectoryEmoji>;

    /// Delete a custom emoji.
    async fn delete_emoji(&self, id: &EmojiId) -> DirectoryResult<()>;
}
