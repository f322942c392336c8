//! Role syncer.
//!
//! Roles are keyed by name. Adds are created then edited, because the
//! platform creates roles with default attributes. Every role present on
//! both sides is re-edited with the full desired attributes each pass, so
//! repeated passes converge to the same state without diffing attributes.

use crate::{FailurePolicy, SyncReport};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use syncbot_core::{DirectoryRole, RoleId, RoleIndex, RoleRecord, reconcile, sorted};
use syncbot_error::SyncResult;
use syncbot_social::DirectoryService;
use tracing::{debug, info, instrument};

/// Role names the reconciler never creates, edits, deletes or assigns.
///
/// Built per pass from configured names plus every role the platform
/// reports as managed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtectedRoles {
    names: HashSet<String>,
}

impl ProtectedRoles {
    /// Protect `names` and every managed role in `current`.
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>, current: &[DirectoryRole]) -> Self {
        let names = names
            .into_iter()
            .map(str::to_string)
            .chain(
                current
                    .iter()
                    .filter(|role| role.managed)
                    .map(|role| role.name.clone()),
            )
            .collect();
        Self { names }
    }

    /// Whether `name` is protected.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

/// Role mutations computed for one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RolePlan {
    /// Roles to create, then edit
    pub create: Vec<RoleRecord>,
    /// Existing roles to re-edit with desired attributes
    pub edit: Vec<(RoleId, RoleRecord)>,
    /// Roles to delete
    pub delete: Vec<DirectoryRole>,
}

impl RolePlan {
    /// Compute the plan from desired records and current roles.
    ///
    /// Protected names are removed from both sides before reconciling, so
    /// they never appear in any part of the plan.
    pub fn new(
        desired: &[RoleRecord],
        current: &[DirectoryRole],
        protected: &ProtectedRoles,
    ) -> Self {
        let desired_by_name: HashMap<&str, &RoleRecord> = desired
            .iter()
            .filter(|role| !protected.contains(&role.name))
            .map(|role| (role.name.as_str(), role))
            .collect();

        let mut current_by_name: HashMap<&str, &DirectoryRole> = HashMap::new();
        for role in current.iter().filter(|role| !protected.contains(&role.name)) {
            current_by_name.entry(role.name.as_str()).or_insert(role);
        }

        let wanted: HashSet<&str> = desired_by_name.keys().copied().collect();
        let existing: HashSet<&str> = current_by_name.keys().copied().collect();
        let diff = reconcile(&wanted, &existing);

        let create = sorted(diff.adds)
            .into_iter()
            .filter_map(|name| desired_by_name.get(name).map(|role| (*role).clone()))
            .collect();

        let edit = sorted(diff.mods)
            .into_iter()
            .filter_map(|name| {
                let record = desired_by_name.get(name)?;
                let role = current_by_name.get(name)?;
                Some((role.id.clone(), (*record).clone()))
            })
            .collect();

        let delete = sorted(diff.dels)
            .into_iter()
            .filter_map(|name| current_by_name.get(name).map(|role| (*role).clone()))
            .collect();

        Self {
            create,
            edit,
            delete,
        }
    }

    /// Names touched by the plan, in create, edit, delete order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.create
            .iter()
            .map(|role| role.name.as_str())
            .chain(self.edit.iter().map(|(_, role)| role.name.as_str()))
            .chain(self.delete.iter().map(|role| role.name.as_str()))
    }

    /// True when nothing would be mutated.
    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.edit.is_empty() && self.delete.is_empty()
    }
}

/// Result of applying a role plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleOutcome {
    /// What was done
    pub report: SyncReport,
    /// Role index after this pass's creates and deletes
    pub index: RoleIndex,
}

/// Applies role plans through the directory service.
#[derive(Clone)]
pub struct RoleSyncer {
    directory: Arc<dyn DirectoryService>,
    policy: FailurePolicy,
}

impl RoleSyncer {
    /// Create a syncer with the given failure policy.
    pub fn new(directory: Arc<dyn DirectoryService>, policy: FailurePolicy) -> Self {
        Self { directory, policy }
    }

    /// Apply `plan`, updating `index` as roles are created and deleted.
    ///
    /// # Errors
    ///
    /// Returns the first failure when the policy is `Abort`.
    #[instrument(skip_all, fields(
        create = plan.create.len(),
        edit = plan.edit.len(),
        delete = plan.delete.len(),
    ))]
    pub async fn apply(&self, plan: &RolePlan, mut index: RoleIndex) -> SyncResult<RoleOutcome> {
        let mut report = SyncReport::default();

        for record in &plan.create {
            match self.directory.create_role(&record.name).await {
                Ok(created) => {
                    info!(role = %record.name, id = %created.id, "Created role");
                    index.insert(&created);
                    match self.directory.edit_role(&created.id, record).await {
                        Ok(_) => report.applied(),
                        Err(e) => report.settle(self.policy, &record.name, e)?,
                    }
                }
                Err(e) => report.settle(self.policy, &record.name, e)?,
            }
        }

        for role in &plan.delete {
            match self.directory.delete_role(&role.id).await {
                Ok(()) => {
                    info!(role = %role.name, id = %role.id, "Deleted role");
                    index.remove(&role.id);
                    report.applied();
                }
                Err(e) => report.settle(self.policy, &role.name, e)?,
            }
        }

        for (id, record) in &plan.edit {
            match self.directory.edit_role(id, record).await {
                Ok(_) => {
                    debug!(role = %record.name, id = %id, "Edited role");
                    report.applied();
                }
                Err(e) => report.settle(self.policy, &record.name, e)?,
            }
        }

        Ok(RoleOutcome { report, index })
    }
}
