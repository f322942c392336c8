//! Emoji syncer.

use crate::{AssetSource, FailurePolicy, SyncReport};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use syncbot_core::{DirectoryEmoji, EmojiRecord, reconcile, sorted};
use syncbot_error::SyncResult;
use syncbot_social::DirectoryService;
use tracing::{info, instrument};

/// Emoji mutations computed for one pass.
///
/// Emoji carry no attributes beyond the name, so names on both sides are
/// left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmojiPlan {
    /// Names to upload
    pub upload: Vec<String>,
    /// Existing emoji to delete
    pub delete: Vec<DirectoryEmoji>,
    /// Names already present
    pub unchanged: Vec<String>,
}

impl EmojiPlan {
    /// Compute the plan from desired records and current emoji.
    pub fn new(desired: &[EmojiRecord], current: &[DirectoryEmoji]) -> Self {
        let mut current_by_name: HashMap<&str, &DirectoryEmoji> = HashMap::new();
        for emoji in current {
            current_by_name.entry(emoji.name.as_str()).or_insert(emoji);
        }

        let wanted: HashSet<&str> = desired.iter().map(|emoji| emoji.name.as_str()).collect();
        let existing: HashSet<&str> = current_by_name.keys().copied().collect();
        let diff = reconcile(&wanted, &existing);

        Self {
            upload: sorted(diff.adds).into_iter().map(str::to_string).collect(),
            delete: sorted(diff.dels)
                .into_iter()
                .filter_map(|name| current_by_name.get(name).map(|emoji| (*emoji).clone()))
                .collect(),
            unchanged: sorted(diff.mods).into_iter().map(str::to_string).collect(),
        }
    }

    /// True when nothing would be mutated.
    pub fn is_empty(&self) -> bool {
        self.upload.is_empty() && self.delete.is_empty()
    }
}

/// Applies emoji plans, loading images from an asset source.
#[derive(Clone)]
pub struct EmojiSyncer {
    directory: Arc<dyn DirectoryService>,
    assets: Arc<dyn AssetSource>,
    policy: FailurePolicy,
}

impl EmojiSyncer {
    /// Create a syncer with the given failure policy.
    pub fn new(
        directory: Arc<dyn DirectoryService>,
        assets: Arc<dyn AssetSource>,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            directory,
            assets,
            policy,
        }
    }

    /// Upload missing emoji and delete extras.
    ///
    /// A missing image fails only that upload.
    ///
    /// # Errors
    ///
    /// Returns the first failure when the policy is `Abort`.
    #[instrument(skip_all, fields(upload = plan.upload.len(), delete = plan.delete.len()))]
    pub async fn apply(&self, plan: &EmojiPlan) -> SyncResult<SyncReport> {
        let mut report = SyncReport::default();

        for name in &plan.upload {
            let image = match self.assets.load(name).await {
                Ok(image) => image,
                Err(e) => {
                    report.settle(self.policy, name, e)?;
                    continue;
                }
            };
            match self.directory.create_emoji(name, &image).await {
                Ok(created) => {
                    info!(emoji = %name, id = %created.id, "Uploaded emoji");
                    report.applied();
                }
                Err(e) => report.settle(self.policy, name, e)?,
            }
        }

        for emoji in &plan.delete {
            match self.directory.delete_emoji(&emoji.id).await {
                Ok(()) => {
                    info!(emoji = %emoji.name, id = %emoji.id, "Deleted emoji");
                    report.applied();
                }
                Err(e) => report.settle(self.policy, &emoji.name, e)?,
            }
        }

        Ok(report)
    }
}
