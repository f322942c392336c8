//! Polling loop.

use crate::{PassMetrics, PassOutcome, ReconciliationPass};
use std::future::Future;
use std::time::Duration;
use syncbot_error::SyncResult;
use tokio::time::sleep;
use tracing::{error, info, instrument};

/// Runs reconciliation passes on a fixed interval.
///
/// Passes never overlap. The interval is measured from the end of one pass
/// to the start of the next. A failed pass is retried at the next interval.
pub struct SyncServer {
    pass: ReconciliationPass,
    interval: Duration,
    metrics: PassMetrics,
}

impl SyncServer {
    /// Creates a new server.
    pub fn new(pass: ReconciliationPass, interval: Duration) -> Self {
        Self {
            pass,
            interval,
            metrics: PassMetrics::new(),
        }
    }

    /// Metrics shared with this server.
    pub fn metrics(&self) -> &PassMetrics {
        &self.metrics
    }

    /// Run one pass and record its metrics.
    ///
    /// # Errors
    ///
    /// Returns the error that aborted the pass.
    pub async fn run_once(&self) -> SyncResult<PassOutcome> {
        let result = self.pass.run().await;
        match &result {
            Ok(outcome) => self.metrics.record_success(outcome),
            Err(_) => self.metrics.record_failure(),
        }

        let snapshot = self.metrics.snapshot();
        info!(
            passes_run = snapshot.passes_run,
            passes_failed = snapshot.passes_failed,
            operations_applied = snapshot.operations_applied,
            operations_failed = snapshot.operations_failed,
            seconds_since_success = snapshot.seconds_since_success,
            "Pass metrics"
        );
        result
    }

    /// Run passes until `shutdown` resolves.
    ///
    /// Shutdown is honoured between passes and while a pass is in flight;
    /// an interrupted pass is dropped.
    #[instrument(skip_all, fields(interval_secs = self.interval.as_secs()))]
    pub async fn run_until<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        info!("Starting reconciliation loop");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                result = self.run_once() => {
                    if let Err(e) = result {
                        error!(error = %e, "Pass failed, retrying next interval");
                    }
                }
            }

            tokio::select! {
                _ = &mut shutdown => break,
                _ = sleep(self.interval) => {}
            }
        }

        info!(passes_run = self.metrics.passes_run(), "Reconciliation loop stopped");
    }
}
