//! In-memory guild implementing the directory service.
//!
//! Mutations change the held `DirectoryState`, so a second pass observes the
//! effects of the first. Every mutation is recorded as a `Call`.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use syncbot_bot::AssetSource;
use syncbot_core::{
    DirectoryEmoji, DirectoryMember, DirectoryRole, DirectoryState, EmojiId, RoleId, RoleRecord,
    UserId,
};
use syncbot_error::{
    AssetError, AssetErrorKind, DirectoryError, DirectoryErrorKind, DirectoryResult,
};
use syncbot_social::DirectoryService;
use syncbot_store::MemoryStore;

/// A recorded mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SetNickname(UserId, String),
    AddMemberRole(UserId, RoleId),
    RemoveMemberRole(UserId, RoleId),
    CreateRole(String),
    EditRole(RoleId, String),
    DeleteRole(RoleId),
    CreateEmoji(String),
    DeleteEmoji(EmojiId),
}

/// Guild held in memory.
pub struct MockGuild {
    state: Mutex<DirectoryState>,
    calls: Mutex<Vec<Call>>,
    failing: Mutex<HashSet<&'static str>>,
    reads_unavailable: Mutex<bool>,
    next_id: AtomicU64,
}

impl MockGuild {
    pub fn new(state: DirectoryState) -> Self {
        Self {
            state: Mutex::new(state),
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            reads_unavailable: Mutex::new(false),
            next_id: AtomicU64::new(9000),
        }
    }

    /// Make every call of `operation` fail, e.g. `"edit_role"`.
    pub fn fail(&self, operation: &'static str) {
        self.failing.lock().insert(operation);
    }

    /// Make every list call fail with `Unavailable`.
    pub fn go_offline(&self) {
        *self.reads_unavailable.lock() = true;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn state(&self) -> DirectoryState {
        self.state.lock().clone()
    }

    pub fn role_named(&self, name: &str) -> Option<DirectoryRole> {
        self.state.lock().roles.iter().find(|r| r.name == name).cloned()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    fn check(&self, operation: &'static str, target: &str) -> DirectoryResult<()> {
        if self.failing.lock().contains(operation) {
            return Err(DirectoryError::operation(operation, target, "injected failure"));
        }
        Ok(())
    }

    fn check_read(&self, operation: &str) -> DirectoryResult<()> {
        if *self.reads_unavailable.lock() {
            return Err(DirectoryError::new(DirectoryErrorKind::Unavailable(format!(
                "{}: offline",
                operation
            ))));
        }
        Ok(())
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

#[async_trait]
impl DirectoryService for MockGuild {
    async fn list_members(&self, limit: u64) -> DirectoryResult<Vec<DirectoryMember>> {
        self.check_read("list_members")?;
        Ok(self
            .state
            .lock()
            .members
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn list_roles(&self) -> DirectoryResult<Vec<DirectoryRole>> {
        self.check_read("list_roles")?;
        Ok(self.state.lock().roles.clone())
    }

    async fn list_emojis(&self) -> DirectoryResult<Vec<DirectoryEmoji>> {
        self.check_read("list_emojis")?;
        Ok(self.state.lock().emojis.clone())
    }

    async fn set_nickname(&self, user: &UserId, nickname: &str) -> DirectoryResult<()> {
        self.record(Call::SetNickname(user.clone(), nickname.to_string()));
        self.check("set_nickname", user.as_str())?;
        let mut state = self.state.lock();
        if let Some(member) = state.members.iter_mut().find(|m| &m.id == user) {
            // An empty nickname resets to the username
            member.nickname = (!nickname.is_empty()).then(|| nickname.to_string());
        }
        Ok(())
    }

    async fn add_member_role(&self, user: &UserId, role: &RoleId) -> DirectoryResult<()> {
        self.record(Call::AddMemberRole(user.clone(), role.clone()));
        self.check("add_member_role", user.as_str())?;
        let mut state = self.state.lock();
        if let Some(member) = state.members.iter_mut().find(|m| &m.id == user)
            && !member.role_ids.contains(role)
        {
            member.role_ids.push(role.clone());
        }
        Ok(())
    }

    async fn remove_member_role(&self, user: &UserId, role: &RoleId) -> DirectoryResult<()> {
        self.record(Call::RemoveMemberRole(user.clone(), role.clone()));
        self.check("remove_member_role", user.as_str())?;
        let mut state = self.state.lock();
        if let Some(member) = state.members.iter_mut().find(|m| &m.id == user) {
            member.role_ids.retain(|id| id != role);
        }
        Ok(())
    }

    async fn create_role(&self, name: &str) -> DirectoryResult<DirectoryRole> {
        self.record(Call::CreateRole(name.to_string()));
        self.check("create_role", name)?;
        let created = DirectoryRole {
            id: RoleId::from(self.next_id()),
            name: name.to_string(),
            color: 0,
            hoist: false,
            mentionable: false,
            permissions: 0,
            managed: false,
        };
        self.state.lock().roles.push(created.clone());
        Ok(created)
    }

    async fn edit_role(&self, id: &RoleId, role: &RoleRecord) -> DirectoryResult<DirectoryRole> {
        self.record(Call::EditRole(id.clone(), role.name.clone()));
        self.check("edit_role", &role.name)?;
        let mut state = self.state.lock();
        let Some(existing) = state.roles.iter_mut().find(|r| &r.id == id) else {
            return Err(DirectoryError::operation("edit_role", &role.name, "Unknown Role"));
        };
        existing.name = role.name.clone();
        existing.color = role.color;
        existing.hoist = role.hoist;
        existing.mentionable = role.mentionable;
        existing.permissions = role.permissions;
        Ok(existing.clone())
    }

    async fn delete_role(&self, id: &RoleId) -> DirectoryResult<()> {
        self.record(Call::DeleteRole(id.clone()));
        self.check("delete_role", id.as_str())?;
        let mut state = self.state.lock();
        state.roles.retain(|r| &r.id != id);
        for member in &mut state.members {
            member.role_ids.retain(|r| r != id);
        }
        Ok(())
    }

    async fn create_emoji(&self, name: &str, image: &[u8]) -> DirectoryResult<DirectoryEmoji> {
        self.record(Call::CreateEmoji(name.to_string()));
        self.check("create_emoji", name)?;
        assert!(!image.is_empty(), "emoji uploaded without image bytes");
        let created = DirectoryEmoji {
            id: EmojiId::from(self.next_id()),
            name: name.to_string(),
        };
        self.state.lock().emojis.push(created.clone());
        Ok(created)
    }

    async fn delete_emoji(&self, id: &EmojiId) -> DirectoryResult<()> {
        self.record(Call::DeleteEmoji(id.clone()));
        self.check("delete_emoji", id.as_str())?;
        self.state.lock().emojis.retain(|e| &e.id != id);
        Ok(())
    }
}

/// Asset source serving fixed images by name.
#[derive(Default)]
pub struct MockAssets {
    images: HashMap<String, Vec<u8>>,
}

impl MockAssets {
    pub fn with(names: &[&str]) -> Self {
        Self {
            images: names
                .iter()
                .map(|name| (name.to_string(), vec![0x89, b'P', b'N', b'G']))
                .collect(),
        }
    }
}

#[async_trait]
impl AssetSource for MockAssets {
    async fn load(&self, name: &str) -> Result<Vec<u8>, AssetError> {
        self.images.get(name).cloned().ok_or_else(|| {
            AssetError::new(AssetErrorKind::NotFound {
                name: name.to_string(),
                path: format!("emojis/{}.png", name).into(),
            })
        })
    }
}

pub fn member(id: &str, username: &str, nickname: Option<&str>, roles: &[&str]) -> DirectoryMember {
    DirectoryMember {
        id: UserId::new(id),
        username: username.to_string(),
        nickname: nickname.map(str::to_string),
        role_ids: roles.iter().map(|r| RoleId::new(*r)).collect(),
    }
}

pub fn role(id: &str, name: &str) -> DirectoryRole {
    DirectoryRole {
        id: RoleId::new(id),
        name: name.to_string(),
        color: 0,
        hoist: false,
        mentionable: false,
        permissions: 0,
        managed: false,
    }
}

pub fn managed_role(id: &str, name: &str) -> DirectoryRole {
    DirectoryRole {
        managed: true,
        ..role(id, name)
    }
}

pub fn emoji(id: &str, name: &str) -> DirectoryEmoji {
    DirectoryEmoji {
        id: EmojiId::new(id),
        name: name.to_string(),
    }
}

/// Store holding the three snapshot lists under the default prefix.
pub fn seed_store(users: &str, roles: &str, emojis: &str) -> MemoryStore {
    let store = MemoryStore::new();
    store.set("syncbot:users", users);
    store.set("syncbot:roles", roles);
    store.set("syncbot:emojis", emojis);
    store
}
