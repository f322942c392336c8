//! Bidirectional role id/name lookup for one pass.

use crate::{DirectoryRole, RoleId};
use std::collections::HashMap;
use tracing::warn;

/// Maps role ids to names and names to ids.
///
/// When two roles share a name the first one read wins the name lookup; both
/// remain resolvable by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleIndex {
    by_id: HashMap<RoleId, String>,
    by_name: HashMap<String, RoleId>,
}

impl RoleIndex {
    /// Index the given roles.
    pub fn new(roles: &[DirectoryRole]) -> Self {
        let mut index = Self::default();
        for role in roles {
            index.insert(role);
        }
        index
    }

    /// Add one role, e.g. one created during the current pass.
    pub fn insert(&mut self, role: &DirectoryRole) {
        self.by_id.insert(role.id.clone(), role.name.clone());
        if self.by_name.contains_key(&role.name) {
            warn!(role = %role.name, id = %role.id, "Duplicate role name, keeping first id");
        } else {
            self.by_name.insert(role.name.clone(), role.id.clone());
        }
    }

    /// Forget a role, e.g. one deleted during the current pass.
    pub fn remove(&mut self, id: &RoleId) {
        if let Some(name) = self.by_id.remove(id)
            && self.by_name.get(&name) == Some(id)
        {
            self.by_name.remove(&name);
        }
    }

    /// Name of the role with the given id.
    pub fn name_of(&self, id: &RoleId) -> Option<&str> {
        self.by_id.get(id).map(String::as_str)
    }

    /// Id of the role with the given name.
    pub fn id_of(&self, name: &str) -> Option<&RoleId> {
        self.by_name.get(name)
    }

    /// Number of distinct role ids.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// True when no roles are indexed.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
