//! Per-syncer outcome accounting.

use crate::FailurePolicy;
use serde::Serialize;
use syncbot_error::{SyncError, SyncResult};
use tracing::warn;

/// Counts of what one syncer did during a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Mutations the directory accepted
    pub applied: usize,
    /// Items deliberately left alone
    pub skipped: usize,
    /// Mutations that failed and were tolerated
    pub failed: usize,
}

impl SyncReport {
    /// Record an accepted mutation.
    pub fn applied(&mut self) {
        self.applied += 1;
    }

    /// Record a skipped item.
    pub fn skipped(&mut self) {
        self.skipped += 1;
    }

    /// Apply `policy` to a failed item.
    ///
    /// Under `Continue` the failure is logged and counted. Under `Abort`, or
    /// when the error invalidates the whole pass, it is returned.
    ///
    /// # Errors
    ///
    /// Returns `error` when the pass must stop.
    pub fn settle(
        &mut self,
        policy: FailurePolicy,
        item: &str,
        error: impl Into<SyncError>,
    ) -> SyncResult<()> {
        let error = error.into();
        if policy == FailurePolicy::Abort || error.is_pass_fatal() {
            return Err(error);
        }
        warn!(item, error = %error, "Item failed, continuing");
        self.failed += 1;
        Ok(())
    }

    /// Add another report's counts to this one.
    pub fn merge(&mut self, other: &SyncReport) {
        self.applied += other.applied;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syncbot_error::{DirectoryError, DirectoryErrorKind};

    #[test]
    fn test_continue_counts_failure() {
        let mut report = SyncReport::default();
        let err = DirectoryError::operation("delete_role", "vip", "Missing Permissions");
        assert!(report.settle(FailurePolicy::Continue, "vip", err).is_ok());
        assert_eq!(report.failed, 1);
    }

    #[test]
    fn test_abort_returns_error() {
        let mut report = SyncReport::default();
        let err = DirectoryError::operation("delete_role", "vip", "Missing Permissions");
        assert!(report.settle(FailurePolicy::Abort, "vip", err).is_err());
        assert_eq!(report.failed, 0);
    }

    #[test]
    fn test_pass_fatal_error_escapes_continue() {
        let mut report = SyncReport::default();
        let err = DirectoryError::new(DirectoryErrorKind::Unavailable("gateway down".into()));
        assert!(report.settle(FailurePolicy::Continue, "vip", err).is_err());
    }
}
