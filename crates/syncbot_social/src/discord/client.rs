//! Serenity-backed directory service.

use super::conversions::{emoji_from, emoji_data_uri, member_from, parse_snowflake, role_from};
use crate::DirectoryService;
use async_trait::async_trait;
use serenity::builder::{EditMember, EditRole};
use serenity::http::Http;
use serenity::model::Permissions;
use serenity::model::id::{
    EmojiId as DiscordEmojiId, GuildId, RoleId as DiscordRoleId, UserId as DiscordUserId,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use syncbot_core::{
    DirectoryEmoji, DirectoryMember, DirectoryRole, EmojiId, RoleId, RoleRecord, UserId,
};
use syncbot_error::{DirectoryError, DirectoryErrorKind, DirectoryResult};
use tracing::{debug, info, instrument};

/// Directory service for one Discord guild.
///
/// Every call is bounded by `timeout`. A read that times out is
/// `DirectoryErrorKind::Timeout`; a mutation that times out is reported as a
/// failed operation on its item.
pub struct DiscordDirectory {
    http: Arc<Http>,
    guild_id: GuildId,
    timeout: Duration,
}

impl DiscordDirectory {
    /// Create a directory for `guild_id` authenticated with a bot token.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryErrorKind::InvalidId` if `guild_id` is not a snowflake.
    #[instrument(skip(token), fields(token_len = token.len()))]
    pub fn new(token: &str, guild_id: &str, timeout: Duration) -> DirectoryResult<Self> {
        let guild_id = GuildId::new(parse_snowflake(guild_id)?);
        info!(guild_id = %guild_id, "Creating Discord directory client");
        Ok(Self::with_http_client(Arc::new(Http::new(token)), guild_id, timeout))
    }

    /// Create a directory sharing an existing HTTP client.
    pub fn with_http_client(http: Arc<Http>, guild_id: GuildId, timeout: Duration) -> Self {
        Self {
            http,
            guild_id,
            timeout,
        }
    }

    async fn read<T, F>(&self, operation: &str, call: F) -> DirectoryResult<T>
    where
        F: Future<Output = serenity::Result<T>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(DirectoryError::new(DirectoryErrorKind::Unavailable(format!(
                "{}: {}",
                operation, e
            )))),
            Err(_) => Err(DirectoryError::new(DirectoryErrorKind::Timeout {
                operation: operation.to_string(),
                seconds: self.timeout.as_secs(),
            })),
        }
    }

    async fn mutate<T, F>(&self, operation: &str, target: &str, call: F) -> DirectoryResult<T>
    where
        F: Future<Output = serenity::Result<T>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(DirectoryError::operation(operation, target, e.to_string())),
            Err(_) => Err(DirectoryError::operation(
                operation,
                target,
                format!("timed out after {}s", self.timeout.as_secs()),
            )),
        }
    }
}

fn user_id(id: &UserId) -> DirectoryResult<DiscordUserId> {
    parse_snowflake(id.as_str()).map(DiscordUserId::new)
}

fn role_id(id: &RoleId) -> DirectoryResult<DiscordRoleId> {
    parse_snowflake(id.as_str()).map(DiscordRoleId::new)
}

fn emoji_id(id: &EmojiId) -> DirectoryResult<DiscordEmojiId> {
    parse_snowflake(id.as_str()).map(DiscordEmojiId::new)
}

#[async_trait]
impl DirectoryService for DiscordDirectory {
    #[instrument(skip(self), fields(guild_id = %self.guild_id))]
    async fn list_members(&self, limit: u64) -> DirectoryResult<Vec<DirectoryMember>> {
        let members = self
            .read(
                "list_members",
                self.http.get_guild_members(self.guild_id, Some(limit), None),
            )
            .await?;
        debug!(count = members.len(), "Fetched guild members");
        Ok(members.into_iter().map(member_from).collect())
    }

    #[instrument(skip(self), fields(guild_id = %self.guild_id))]
    async fn list_roles(&self) -> DirectoryResult<Vec<DirectoryRole>> {
        let roles = self
            .read("list_roles", self.http.get_guild_roles(self.guild_id))
            .await?;
        debug!(count = roles.len(), "Fetched guild roles");
        Ok(roles.into_iter().map(role_from).collect())
    }

    #[instrument(skip(self), fields(guild_id = %self.guild_id))]
    async fn list_emojis(&self) -> DirectoryResult<Vec<DirectoryEmoji>> {
        let emojis = self
            .read("list_emojis", self.http.get_emojis(self.guild_id))
            .await?;
        debug!(count = emojis.len(), "Fetched guild emojis");
        Ok(emojis.into_iter().map(emoji_from).collect())
    }

    #[instrument(skip(self), fields(guild_id = %self.guild_id))]
    async fn set_nickname(&self, user: &UserId, nickname: &str) -> DirectoryResult<()> {
        let user_id = user_id(user)?;
        self.mutate(
            "set_nickname",
            user.as_str(),
            self.guild_id
                .edit_member(&*self.http, user_id, EditMember::new().nickname(nickname)),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(guild_id = %self.guild_id))]
    async fn add_member_role(&self, user: &UserId, role: &RoleId) -> DirectoryResult<()> {
        let (user_id, role_id) = (user_id(user)?, role_id(role)?);
        self.mutate(
            "add_member_role",
            user.as_str(),
            self.http
                .add_member_role(self.guild_id, user_id, role_id, None),
        )
        .await
    }

    #[instrument(skip(self), fields(guild_id = %self.guild_id))]
    async fn remove_member_role(&self, user: &UserId, role: &RoleId) -> DirectoryResult<()> {
        let (user_id, role_id) = (user_id(user)?, role_id(role)?);
        self.mutate(
            "remove_member_role",
            user.as_str(),
            self.http
                .remove_member_role(self.guild_id, user_id, role_id, None),
        )
        .await
    }

    #[instrument(skip(self), fields(guild_id = %self.guild_id))]
    async fn create_role(&self, name: &str) -> DirectoryResult<DirectoryRole> {
        let role = self
            .mutate(
                "create_role",
                name,
                self.guild_id
                    .create_role(&*self.http, EditRole::new().name(name)),
            )
            .await?;
        Ok(role_from(role))
    }

    #[instrument(skip(self, role), fields(guild_id = %self.guild_id, role = %role.name))]
    async fn edit_role(&self, id: &RoleId, role: &RoleRecord) -> DirectoryResult<DirectoryRole> {
        let role_id = role_id(id)?;
        let builder = EditRole::new()
            .name(role.name.as_str())
            .colour(role.color)
            .hoist(role.hoist)
            .mentionable(role.mentionable)
            .permissions(Permissions::from_bits_truncate(role.permissions));
        let edited = self
            .mutate(
                "edit_role",
                &role.name,
                self.guild_id.edit_role(&*self.http, role_id, builder),
            )
            .await?;
        Ok(role_from(edited))
    }

    #[instrument(skip(self), fields(guild_id = %self.guild_id))]
    async fn delete_role(&self, id: &RoleId) -> DirectoryResult<()> {
        let role_id = role_id(id)?;
        self.mutate(
            "delete_role",
            id.as_str(),
            self.guild_id.delete_role(&*self.http, role_id),
        )
        .await
    }

    #[instrument(skip(self, image), fields(guild_id = %self.guild_id, bytes = image.len()))]
    async fn create_emoji(&self, name: &str, image: &[u8]) -> DirectoryResult<DirectoryEmoji> {
        let data_uri = emoji_data_uri(image);
        let emoji = self
            .mutate(
                "create_emoji",
                name,
                self.guild_id.create_emoji(&*self.http, name, &data_uri),
            )
            .await?;
        Ok(emoji_from(emoji))
    }

    #[instrument(skip(self), fields(guild_id = %self.guild_id))]
    async fn delete_emoji(&self, id: &EmojiId) -> DirectoryResult<()> {
        let emoji_id = emoji_id(id)?;
        self.mutate(
            "delete_emoji",
            id.as_str(),
            self.guild_id.delete_emoji(&*self.http, emoji_id),
        )
        .await
    }
}
