//! Conversions between serenity models and directory mirrors.

use base64::Engine as _;
use serenity::model::guild::{Emoji, Member, Role};
use syncbot_core::{DirectoryEmoji, DirectoryMember, DirectoryRole, EmojiId, RoleId, UserId};
use syncbot_error::{DirectoryError, DirectoryErrorKind, DirectoryResult};

/// Parse a Discord snowflake.
///
/// # Errors
///
/// Returns `DirectoryErrorKind::InvalidId` for anything that is not a
/// non-zero unsigned integer.
#[track_caller]
pub fn parse_snowflake(id: &str) -> DirectoryResult<u64> {
    match id.trim().parse::<u64>() {
        Ok(value) if value != 0 => Ok(value),
        _ => Err(DirectoryError::new(DirectoryErrorKind::InvalidId(
            id.to_string(),
        ))),
    }
}

/// Encode PNG bytes as the data URI Discord expects for emoji uploads.
pub fn emoji_data_uri(image: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(image)
    )
}

pub(super) fn member_from(member: Member) -> DirectoryMember {
    DirectoryMember {
        id: UserId::from(member.user.id.get()),
        username: member.user.name,
        nickname: member.nick,
        role_ids: member
            .roles
            .into_iter()
            .map(|id| RoleId::from(id.get()))
            .collect(),
    }
}

pub(super) fn role_from(role: Role) -> DirectoryRole {
    DirectoryRole {
        id: RoleId::from(role.id.get()),
        name: role.name,
        color: role.colour.0,
        hoist: role.hoist,
        mentionable: role.mentionable,
        permissions: role.permissions.bits(),
        managed: role.managed,
    }
}

pub(super) fn emoji_from(emoji: Emoji) -> DirectoryEmoji {
    DirectoryEmoji {
        id: EmojiId::from(emoji.id.get()),
        name: emoji.name,
    }
}
