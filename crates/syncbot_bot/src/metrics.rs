//! Metrics collection for reconciliation passes.

use crate::PassOutcome;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Counters shared across passes.
#[derive(Debug, Clone)]
pub struct PassMetrics {
    inner: Arc<PassMetricsInner>,
}

#[derive(Debug)]
struct PassMetricsInner {
    passes_run: AtomicU64,
    passes_failed: AtomicU64,
    operations_applied: AtomicU64,
    operations_skipped: AtomicU64,
    operations_failed: AtomicU64,
    last_success: parking_lot::Mutex<Option<Instant>>,
}

impl Default for PassMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PassMetrics {
    /// Creates a new metrics collector.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(PassMetricsInner {
                passes_run: AtomicU64::new(0),
                passes_failed: AtomicU64::new(0),
                operations_applied: AtomicU64::new(0),
                operations_skipped: AtomicU64::new(0),
                operations_failed: AtomicU64::new(0),
                last_success: parking_lot::Mutex::new(None),
            }),
        }
    }

    /// Records a completed pass.
    pub fn record_success(&self, outcome: &PassOutcome) {
        let total = outcome.total();
        self.inner.passes_run.fetch_add(1, Ordering::Relaxed);
        self.inner
            .operations_applied
            .fetch_add(total.applied as u64, Ordering::Relaxed);
        self.inner
            .operations_skipped
            .fetch_add(total.skipped as u64, Ordering::Relaxed);
        self.inner
            .operations_failed
            .fetch_add(total.failed as u64, Ordering::Relaxed);
        *self.inner.last_success.lock() = Some(Instant::now());
    }

    /// Records an aborted pass.
    pub fn record_failure(&self) {
        self.inner.passes_run.fetch_add(1, Ordering::Relaxed);
        self.inner.passes_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Passes started, completed or not.
    pub fn passes_run(&self) -> u64 {
        self.inner.passes_run.load(Ordering::Relaxed)
    }

    /// Passes aborted.
    pub fn passes_failed(&self) -> u64 {
        self.inner.passes_failed.load(Ordering::Relaxed)
    }

    /// Time since the last completed pass.
    pub fn time_since_success(&self) -> Option<Duration> {
        self.inner
            .last_success
            .lock()
            .map(|instant| instant.elapsed())
    }

    /// Creates a serializable snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            passes_run: self.passes_run(),
            passes_failed: self.passes_failed(),
            operations_applied: self.inner.operations_applied.load(Ordering::Relaxed),
            operations_skipped: self.inner.operations_skipped.load(Ordering::Relaxed),
            operations_failed: self.inner.operations_failed.load(Ordering::Relaxed),
            seconds_since_success: self.time_since_success().map(|d| d.as_secs()),
        }
    }
}

/// Serializable snapshot of pass metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Passes started
    pub passes_run: u64,
    /// Passes aborted
    pub passes_failed: u64,
    /// Mutations applied across all passes
    pub operations_applied: u64,
    /// Items skipped across all passes
    pub operations_skipped: u64,
    /// Tolerated item failures across all passes
    pub operations_failed: u64,
    /// Seconds since the last completed pass
    pub seconds_since_success: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyncReport;

    #[test]
    fn test_counts_accumulate() {
        let metrics = PassMetrics::new();
        let outcome = PassOutcome {
            roles: SyncReport {
                applied: 2,
                skipped: 0,
                failed: 1,
            },
            emojis: SyncReport::default(),
            members: SyncReport {
                applied: 3,
                skipped: 1,
                failed: 0,
            },
        };

        metrics.record_success(&outcome);
        metrics.record_failure();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.passes_run, 2);
        assert_eq!(snapshot.passes_failed, 1);
        assert_eq!(snapshot.operations_applied, 5);
        assert_eq!(snapshot.operations_skipped, 1);
        assert_eq!(snapshot.operations_failed, 1);
        assert_eq!(snapshot.seconds_since_success, Some(0));
    }

    #[test]
    fn test_no_success_yet() {
        assert_eq!(PassMetrics::new().snapshot().seconds_since_success, None);
    }
}
