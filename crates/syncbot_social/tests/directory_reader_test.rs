//! Tests for pass-scoped directory reads.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use syncbot_core::{
    DirectoryEmoji, DirectoryMember, DirectoryRole, EmojiId, RoleId, RoleRecord, UserId,
};
use syncbot_error::{DirectoryError, DirectoryErrorKind, DirectoryResult};
use syncbot_social::{DirectoryReader, DirectoryService};

/// Read-only fake guild that records the member limit it was asked for.
#[derive(Default)]
struct FakeGuild {
    members: Vec<DirectoryMember>,
    roles: Vec<DirectoryRole>,
    emojis: Vec<DirectoryEmoji>,
    roles_unavailable: bool,
    requested_limit: Mutex<Option<u64>>,
}

#[async_trait]
impl DirectoryService for FakeGuild {
    async fn list_members(&self, limit: u64) -> DirectoryResult<Vec<DirectoryMember>> {
        *self.requested_limit.lock() = Some(limit);
        Ok(self.members.iter().take(limit as usize).cloned().collect())
    }

    async fn list_roles(&self) -> DirectoryResult<Vec<DirectoryRole>> {
        if self.roles_unavailable {
            return Err(DirectoryError::new(DirectoryErrorKind::Unavailable(
                "roles offline".to_string(),
            )));
        }
        Ok(self.roles.clone())
    }

    async fn list_emojis(&self) -> DirectoryResult<Vec<DirectoryEmoji>> {
        Ok(self.emojis.clone())
    }

    async fn set_nickname(&self, _user: &UserId, _nickname: &str) -> DirectoryResult<()> {
        unreachable!("reader never mutates")
    }

    async fn add_member_role(&self, _user: &UserId, _role: &RoleId) -> DirectoryResult<()> {
        unreachable!("reader never mutates")
    }

    async fn remove_member_role(&self, _user: &UserId, _role: &RoleId) -> DirectoryResult<()> {
        unreachable!("reader never mutates")
    }

    async fn create_role(&self, _name: &str) -> DirectoryResult<DirectoryRole> {
        unreachable!("reader never mutates")
    }

    async fn edit_role(&self, _id: &RoleId, _role: &RoleRecord) -> DirectoryResult<DirectoryRole> {
        unreachable!("reader never mutates")
    }

    async fn delete_role(&self, _id: &RoleId) -> DirectoryResult<()> {
        unreachable!("reader never mutates")
    }

    async fn create_emoji(&self, _name: &str, _image: &[u8]) -> DirectoryResult<DirectoryEmoji> {
        unreachable!("reader never mutates")
    }

    async fn delete_emoji(&self, _id: &EmojiId) -> DirectoryResult<()> {
        unreachable!("reader never mutates")
    }
}

fn member(id: u64, username: &str, nickname: Option<&str>, roles: &[u64]) -> DirectoryMember {
    DirectoryMember {
        id: UserId::from(id),
        username: username.to_string(),
        nickname: nickname.map(str::to_string),
        role_ids: roles.iter().copied().map(RoleId::from).collect(),
    }
}

fn role(id: u64, name: &str) -> DirectoryRole {
    DirectoryRole {
        id: RoleId::from(id),
        name: name.to_string(),
        color: 0,
        hoist: false,
        mentionable: false,
        permissions: 0,
        managed: false,
    }
}

#[tokio::test]
async fn test_read_collects_all_collections() {
    let guild = FakeGuild {
        members: vec![
            member(1, "alice", Some("Al"), &[10]),
            member(2, "bob", None, &[]),
        ],
        roles: vec![role(10, "member"), role(11, "vip")],
        emojis: vec![DirectoryEmoji {
            id: EmojiId::from(100),
            name: "party".to_string(),
        }],
        ..Default::default()
    };
    let reader = DirectoryReader::new(Arc::new(guild), 1000);

    let state = reader.read().await.expect("read succeeds");

    assert_eq!(state.members.len(), 2);
    assert_eq!(state.roles.len(), 2);
    assert_eq!(state.emojis.len(), 1);
    assert_eq!(state.member(&UserId::from(1)).map(|m| m.display_name()), Some("Al"));
    assert_eq!(state.member(&UserId::from(2)).map(|m| m.display_name()), Some("bob"));
    assert_eq!(state.role_index().id_of("vip"), Some(&RoleId::from(11)));
}

#[tokio::test]
async fn test_read_passes_member_limit() {
    let guild = Arc::new(FakeGuild {
        members: (1..=5).map(|id| member(id, "user", None, &[])).collect(),
        ..Default::default()
    });
    let reader = DirectoryReader::new(guild.clone(), 3);

    let state = reader.read().await.expect("read succeeds");

    assert_eq!(*guild.requested_limit.lock(), Some(3));
    assert_eq!(state.members.len(), 3);
}

#[tokio::test]
async fn test_read_fails_whole_when_one_list_fails() {
    let guild = FakeGuild {
        members: vec![member(1, "alice", None, &[])],
        roles_unavailable: true,
        ..Default::default()
    };
    let reader = DirectoryReader::new(Arc::new(guild), 1000);

    let err = reader.read().await.expect_err("roles are offline");

    assert!(matches!(err.kind, DirectoryErrorKind::Unavailable(_)));
}
