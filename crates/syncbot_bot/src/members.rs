//! Membership syncer.
//!
//! For each desired user: push the nickname, then reconcile the member's
//! role names against the desired ones. Role adds resolve through the role
//! index, which must already include roles created earlier in the pass.
//! Role removals are always computed but only applied when
//! `remove_unlisted_roles` is enabled.

use crate::{FailurePolicy, MemberSettings, NicknamePolicy, ProtectedRoles, SyncReport};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use syncbot_core::{DirectoryMember, RoleId, RoleIndex, UserId, UserRecord, reconcile, sorted};
use syncbot_error::SyncResult;
use syncbot_social::DirectoryService;
use tracing::{debug, info, instrument, warn};

/// Truncate `name` to at most `max` characters.
///
/// # Examples
///
/// ```
/// use syncbot_bot::clamp_nickname;
///
/// assert_eq!(clamp_nickname("Chairman", 5), "Chair");
/// assert_eq!(clamp_nickname("毛泽东同志", 3), "毛泽东");
/// ```
pub fn clamp_nickname(name: &str, max: usize) -> String {
    name.chars().take(max).collect()
}

/// A role a member currently holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    /// Role id
    pub id: RoleId,
    /// Role name
    pub name: String,
}

/// Changes computed for one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberPlan {
    /// Member to change
    pub user_id: UserId,
    /// Nickname to push, if any
    pub nickname: Option<String>,
    /// Role names to assign
    pub add_roles: Vec<String>,
    /// Held roles the snapshot does not list
    pub remove_roles: Vec<RoleAssignment>,
}

impl MemberPlan {
    /// True when nothing would be mutated.
    pub fn is_empty(&self) -> bool {
        self.nickname.is_none() && self.add_roles.is_empty() && self.remove_roles.is_empty()
    }
}

/// Member changes computed for one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipPlan {
    /// Per-member changes, in snapshot order
    pub changes: Vec<MemberPlan>,
    /// Desired users not found among the fetched members
    pub missing: Vec<UserId>,
}

impl MembershipPlan {
    /// Compute the plan for every desired user.
    ///
    /// Current role ids are resolved to names through `index`; ids the index
    /// does not know are ignored. Protected roles are excluded on both sides.
    pub fn new(
        users: &[UserRecord],
        members: &[DirectoryMember],
        index: &RoleIndex,
        protected: &ProtectedRoles,
        settings: &MemberSettings,
    ) -> Self {
        let members: HashMap<&UserId, &DirectoryMember> =
            members.iter().map(|member| (&member.id, member)).collect();

        let mut plan = Self::default();
        for user in users {
            let Some(member) = members.get(&user.id) else {
                plan.missing.push(user.id.clone());
                continue;
            };
            plan.changes
                .push(Self::plan_member(user, member, index, protected, settings));
        }
        plan
    }

    fn plan_member(
        user: &UserRecord,
        member: &DirectoryMember,
        index: &RoleIndex,
        protected: &ProtectedRoles,
        settings: &MemberSettings,
    ) -> MemberPlan {
        let desired_nickname = clamp_nickname(&user.display_name, settings.max_nickname_length);
        // An empty nickname clears it, so compare against the nickname alone
        let effective = if desired_nickname.is_empty() {
            member.nickname.as_deref().unwrap_or_default()
        } else {
            member.display_name()
        };
        let nickname = match settings.nickname_policy {
            NicknamePolicy::Always => Some(desired_nickname),
            NicknamePolicy::WhenChanged if effective != desired_nickname => {
                Some(desired_nickname)
            }
            NicknamePolicy::WhenChanged => None,
        };

        let held: HashMap<&str, &RoleId> = member
            .role_ids
            .iter()
            .filter_map(|id| index.name_of(id).map(|name| (name, id)))
            .filter(|(name, _)| !protected.contains(name))
            .collect();

        let wanted: HashSet<&str> = user
            .role_names
            .iter()
            .map(String::as_str)
            .filter(|name| !protected.contains(name))
            .collect();
        let current: HashSet<&str> = held.keys().copied().collect();
        let diff = reconcile(&wanted, &current);

        MemberPlan {
            user_id: user.id.clone(),
            nickname,
            add_roles: sorted(diff.adds).into_iter().map(str::to_string).collect(),
            remove_roles: sorted(diff.dels)
                .into_iter()
                .filter_map(|name| {
                    held.get(name).map(|id| RoleAssignment {
                        id: (*id).clone(),
                        name: name.to_string(),
                    })
                })
                .collect(),
        }
    }

    /// Plans that would mutate something.
    pub fn pending(&self) -> impl Iterator<Item = &MemberPlan> {
        self.changes.iter().filter(|change| !change.is_empty())
    }
}

/// Applies membership plans through the directory service.
#[derive(Clone)]
pub struct MembershipSyncer {
    directory: Arc<dyn DirectoryService>,
    policy: FailurePolicy,
    remove_unlisted_roles: bool,
}

impl MembershipSyncer {
    /// Create a syncer.
    pub fn new(
        directory: Arc<dyn DirectoryService>,
        policy: FailurePolicy,
        remove_unlisted_roles: bool,
    ) -> Self {
        Self {
            directory,
            policy,
            remove_unlisted_roles,
        }
    }

    /// Push nicknames and role assignments.
    ///
    /// Role names missing from `index` are skipped and reported.
    ///
    /// # Errors
    ///
    /// Returns the first failure when the policy is `Abort`.
    #[instrument(skip_all, fields(members = plan.changes.len(), missing = plan.missing.len()))]
    pub async fn apply(&self, plan: &MembershipPlan, index: &RoleIndex) -> SyncResult<SyncReport> {
        let mut report = SyncReport::default();

        for user_id in &plan.missing {
            warn!(user_id = %user_id, "Desired user is not a fetched member, skipping");
            report.skipped();
        }

        for change in &plan.changes {
            self.apply_member(change, index, &mut report).await?;
        }

        Ok(report)
    }

    async fn apply_member(
        &self,
        change: &MemberPlan,
        index: &RoleIndex,
        report: &mut SyncReport,
    ) -> SyncResult<()> {
        let user_id = &change.user_id;

        if let Some(nickname) = &change.nickname {
            match self.directory.set_nickname(user_id, nickname).await {
                Ok(()) => {
                    debug!(user_id = %user_id, nickname = %nickname, "Set nickname");
                    report.applied();
                }
                Err(e) => report.settle(self.policy, user_id.as_str(), e)?,
            }
        }

        for name in &change.add_roles {
            let Some(role_id) = index.id_of(name) else {
                warn!(user_id = %user_id, role = %name, "Role does not exist, skipping assignment");
                report.skipped();
                continue;
            };
            match self.directory.add_member_role(user_id, role_id).await {
                Ok(()) => {
                    info!(user_id = %user_id, role = %name, "Assigned role");
                    report.applied();
                }
                Err(e) => report.settle(self.policy, user_id.as_str(), e)?,
            }
        }

        for role in &change.remove_roles {
            if !self.remove_unlisted_roles {
                debug!(user_id = %user_id, role = %role.name, "Unlisted role kept");
                report.skipped();
                continue;
            }
            match self.directory.remove_member_role(user_id, &role.id).await {
                Ok(()) => {
                    info!(user_id = %user_id, role = %role.name, "Removed role");
                    report.applied();
                }
                Err(e) => report.settle(self.policy, user_id.as_str(), e)?,
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use syncbot_core::DirectoryRole;

    fn role(id: &str, name: &str) -> DirectoryRole {
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

    fn user(id: &str, name: &str, roles: &[&str]) -> UserRecord {
        UserRecord {
            id: UserId::new(id),
            display_name: name.to_string(),
            role_names: roles.iter().map(|r| r.to_string()).collect::<BTreeSet<_>>(),
        }
    }

    fn member(id: &str, nick: Option<&str>, roles: &[&str]) -> DirectoryMember {
        DirectoryMember {
            id: UserId::new(id),
            username: "base".to_string(),
            nickname: nick.map(str::to_string),
            role_ids: roles.iter().map(|r| RoleId::new(*r)).collect(),
        }
    }

    #[test]
    fn test_clamp_counts_characters() {
        let long = "x".repeat(40);
        assert_eq!(clamp_nickname(&long, 32).chars().count(), 32);
        assert_eq!(clamp_nickname("short", 32), "short");
    }

    #[test]
    fn test_when_changed_skips_matching_name() {
        let settings = MemberSettings {
            nickname_policy: NicknamePolicy::WhenChanged,
            ..Default::default()
        };
        let index = RoleIndex::default();
        let plan = MembershipPlan::new(
            &[user("1", "Al", &[]), user("2", "Bo", &[])],
            &[member("1", Some("Al"), &[]), member("2", Some("Bob"), &[])],
            &index,
            &ProtectedRoles::default(),
            &settings,
        );

        assert_eq!(plan.changes[0].nickname, None);
        assert_eq!(plan.changes[1].nickname.as_deref(), Some("Bo"));
    }

    #[test]
    fn test_when_changed_treats_empty_name_as_cleared_nickname() {
        let settings = MemberSettings {
            nickname_policy: NicknamePolicy::WhenChanged,
            ..Default::default()
        };
        let plan = MembershipPlan::new(
            &[user("1", "", &[]), user("2", "", &[])],
            &[member("1", None, &[]), member("2", Some("Bob"), &[])],
            &RoleIndex::default(),
            &ProtectedRoles::default(),
            &settings,
        );

        assert_eq!(plan.changes[0].nickname, None);
        assert_eq!(plan.changes[1].nickname.as_deref(), Some(""));
    }

    #[test]
    fn test_protected_roles_are_neither_added_nor_removed() {
        let roles = vec![role("10", "member"), role("11", "Syncbot")];
        let index = RoleIndex::new(&roles);
        let protected = ProtectedRoles::new(["@everyone", "Syncbot"], &roles);

        let plan = MembershipPlan::new(
            &[user("1", "Al", &["@everyone"])],
            &[member("1", None, &["10", "11"])],
            &index,
            &protected,
            &MemberSettings::default(),
        );

        assert!(plan.changes[0].add_roles.is_empty());
        assert_eq!(
            plan.changes[0].remove_roles,
            vec![RoleAssignment {
                id: RoleId::new("10"),
                name: "member".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_member_is_reported() {
        let plan = MembershipPlan::new(
            &[user("404", "Ghost", &[])],
            &[],
            &RoleIndex::default(),
            &ProtectedRoles::default(),
            &MemberSettings::default(),
        );

        assert!(plan.changes.is_empty());
        assert_eq!(plan.missing, vec![UserId::new("404")]);
    }
}
