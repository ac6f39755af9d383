use crate::runtime::IdleClock;
use chrono::{Duration as ChronoDuration, Utc};
use namesmith_application::ports::{DomainRepository, JobFunc, JobSpec, WorkQueue};
use namesmith_domain::DomainError;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Global recheck lock key; at most one worker fleet-wide runs a sweep.
pub const RECHECK_LOCK_KEY: &str = "namesmith:recheck:lock";
/// Lock TTL bounds how long a dead holder can block the sweep.
pub const RECHECK_LOCK_TTL: Duration = Duration::from_secs(300);
const RECHECK_JOB_TIMEOUT: Duration = Duration::from_secs(300);

/// Supervisor that turns worker idle time into recheck sweeps.
///
/// Every poll tick it checks that the queue is empty and the worker has
/// been idle past the threshold, then competes for the global lock. The
/// winner enqueues one batch of the stalest records and releases the lock;
/// losers back off to the next tick.
pub struct IdleRecheckJob {
    queue: Arc<dyn WorkQueue>,
    domains: Arc<dyn DomainRepository>,
    idle_clock: Arc<IdleClock>,
    poll_interval: Duration,
    idle_threshold: Duration,
    recheck_interval_days: u32,
    batch_size: u32,
    shutdown: CancellationToken,
}

impl IdleRecheckJob {
    pub fn new(
        queue: Arc<dyn WorkQueue>,
        domains: Arc<dyn DomainRepository>,
        idle_clock: Arc<IdleClock>,
    ) -> Self {
        Self {
            queue,
            domains,
            idle_clock,
            poll_interval: Duration::from_secs(30),
            idle_threshold: Duration::from_secs(60),
            recheck_interval_days: 7,
            batch_size: 50,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_idle_threshold(mut self, threshold: Duration) -> Self {
        self.idle_threshold = threshold;
        self
    }

    pub fn with_recheck_interval_days(mut self, days: u32) -> Self {
        self.recheck_interval_days = days;
        self
    }

    pub fn with_batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(
            poll_interval_secs = self.poll_interval.as_secs(),
            idle_threshold_secs = self.idle_threshold.as_secs(),
            "Starting idle recheck supervisor"
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.poll_interval);
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => break,
                    _ = interval.tick() => {
                        match self.tick().await {
                            Ok(true) => info!("Recheck sweep enqueued"),
                            Ok(false) => {}
                            Err(e) => warn!(error = %e, "Recheck tick failed"),
                        }
                    }
                }
            }
            info!("Idle recheck supervisor stopped");
        });
    }

    /// One supervisor pass. Returns whether a sweep job was enqueued.
    pub async fn tick(&self) -> Result<bool, DomainError> {
        let depth = self.queue.queue_depth().await?;
        if depth > 0 {
            return Ok(false);
        }

        if self.idle_clock.idle_for() < self.idle_threshold {
            return Ok(false);
        }

        if !self
            .queue
            .set_if_absent(RECHECK_LOCK_KEY, RECHECK_LOCK_TTL)
            .await?
        {
            debug!("Another worker holds the recheck lock");
            return Ok(false);
        }

        let result = self.enqueue_sweep().await;
        // The TTL would clean up after a crash; explicit release keeps the
        // sweep cadence tight.
        if let Err(e) = self.queue.delete(RECHECK_LOCK_KEY).await {
            warn!(error = %e, "Failed to release recheck lock");
        }
        result
    }

    async fn enqueue_sweep(&self) -> Result<bool, DomainError> {
        let cutoff = Utc::now() - ChronoDuration::days(i64::from(self.recheck_interval_days));
        let stale = self.domains.find_stale(cutoff, self.batch_size).await?;
        if stale.is_empty() {
            debug!("No stale domains to recheck");
            return Ok(false);
        }

        let fqdns: Vec<String> = stale.into_iter().map(|record| record.fqdn).collect();
        info!(batch = fqdns.len(), "Enqueueing recheck sweep");

        self.queue
            .enqueue(JobSpec {
                func: JobFunc::RecheckBatch,
                args: json!({ "domains": fqdns }),
                timeout: RECHECK_JOB_TIMEOUT,
            })
            .await?;
        Ok(true)
    }
}
