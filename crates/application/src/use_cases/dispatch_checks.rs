use crate::ports::{
    JobFunc, JobHandle, JobSpec, JobStatus, WorkQueue, WorkerTelemetryRepository, WorkerUpdate,
};
use crate::services::domain_validator;
use chrono::Utc;
use namesmith_domain::{CheckResult, CheckStatus, QueueSnapshot};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const ENQUEUE_RETRY_DELAYS: [Duration; 3] = [
    Duration::from_millis(100),
    Duration::from_millis(200),
    Duration::from_millis(300),
];
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Everything one dispatched batch produced.
///
/// `statuses` is total over the input set: every candidate handed to
/// [`DispatchChecksUseCase::execute`] appears exactly once.
#[derive(Debug, Default)]
pub struct DispatchOutcome {
    pub statuses: HashMap<String, CheckStatus>,
    pub invalid: Vec<String>,
    pub worker_updates: Vec<WorkerUpdate>,
    pub jobs_dispatched: u32,
}

/// API-side fan-out: one queue job per valid candidate, harvested under a
/// deadline, with queue/worker telemetry written on the side.
pub struct DispatchChecksUseCase {
    queue: Arc<dyn WorkQueue>,
    telemetry: Arc<dyn WorkerTelemetryRepository>,
    job_timeout: Duration,
}

impl DispatchChecksUseCase {
    pub fn new(
        queue: Arc<dyn WorkQueue>,
        telemetry: Arc<dyn WorkerTelemetryRepository>,
        job_timeout: Duration,
    ) -> Self {
        Self {
            queue,
            telemetry,
            job_timeout,
        }
    }

    /// Dispatch a batch. Never fails: candidates that cannot be checked
    /// come back `NonConclusive`, rejects come back `Invalid`.
    #[instrument(skip(self, candidates), fields(batch = candidates.len()))]
    pub async fn execute(&self, candidates: &[String]) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();

        let (valid, invalid) = domain_validator::filter(candidates);
        for fqdn in &invalid {
            outcome.statuses.insert(fqdn.clone(), CheckStatus::Invalid);
        }
        outcome.invalid = invalid;

        if valid.is_empty() {
            return outcome;
        }

        let pending = self.enqueue_batch(&valid, &mut outcome).await;
        self.spawn_snapshot();

        let results = self.collect_with_deadline(pending).await;
        let mut per_worker: HashMap<String, WorkerUpdate> = HashMap::new();
        for result in results {
            let update = per_worker
                .entry(result.worker_id.clone())
                .or_insert_with(|| WorkerUpdate {
                    worker_id: result.worker_id.clone(),
                    ..WorkerUpdate::default()
                });
            update.jobs += 1;
            update.processing_ms += result.processing_ms;
            update.queue_wait_ms += result.queue_wait_ms;
            outcome.statuses.insert(result.fqdn, result.status);
        }

        // Whatever has no harvested result by now is inconclusive; the
        // abandoned job may still finish and is simply discarded.
        for fqdn in valid {
            outcome
                .statuses
                .entry(fqdn)
                .or_insert(CheckStatus::NonConclusive);
        }

        outcome.worker_updates = per_worker.into_values().collect();
        if !outcome.worker_updates.is_empty() {
            let telemetry = self.telemetry.clone();
            let updates = outcome.worker_updates.clone();
            tokio::spawn(async move {
                if let Err(e) = telemetry.accumulate(&updates).await {
                    warn!(error = %e, "Failed to accumulate worker metrics");
                }
            });
        }
        self.spawn_snapshot();

        outcome
    }

    /// Enqueue one `check_domain` job per candidate, retrying transient
    /// failures. Candidates whose enqueue exhausts its retries get no
    /// handle and fall through to `NonConclusive`.
    async fn enqueue_batch(
        &self,
        valid: &[String],
        outcome: &mut DispatchOutcome,
    ) -> Vec<(String, JobHandle)> {
        let mut pending = Vec::with_capacity(valid.len());

        for fqdn in valid {
            let spec = JobSpec {
                func: JobFunc::CheckDomain,
                args: json!({
                    "domain": fqdn,
                    "enqueued_at": Utc::now().timestamp_millis() as f64 / 1000.0,
                }),
                timeout: self.job_timeout,
            };

            match self.enqueue_with_retry(spec, fqdn).await {
                Some(handle) => {
                    outcome.jobs_dispatched += 1;
                    pending.push((fqdn.clone(), handle));
                }
                None => {
                    warn!(fqdn = %fqdn, "Enqueue failed after retries, degrading to unknown");
                }
            }
        }

        pending
    }

    async fn enqueue_with_retry(&self, spec: JobSpec, fqdn: &str) -> Option<JobHandle> {
        for (attempt, delay) in ENQUEUE_RETRY_DELAYS.iter().enumerate() {
            match self.queue.enqueue(spec.clone()).await {
                Ok(handle) => return Some(handle),
                Err(e) => {
                    debug!(fqdn = %fqdn, attempt = attempt + 1, error = %e, "Enqueue attempt failed");
                    tokio::time::sleep(*delay).await;
                }
            }
        }
        None
    }

    /// Poll job statuses until everything is harvested or the deadline
    /// passes. Failed jobs are dropped; their names synthesize later.
    async fn collect_with_deadline(
        &self,
        mut pending: Vec<(String, JobHandle)>,
    ) -> Vec<CheckResult> {
        let deadline = tokio::time::Instant::now() + self.job_timeout;
        let mut harvested = Vec::with_capacity(pending.len());

        while !pending.is_empty() && tokio::time::Instant::now() < deadline {
            let mut still_pending = Vec::with_capacity(pending.len());

            for (fqdn, handle) in pending {
                match self.queue.job_status(&handle).await {
                    Ok(JobStatus::Finished(value)) => {
                        match serde_json::from_value::<CheckResult>(value) {
                            Ok(result) => harvested.push(result),
                            Err(e) => {
                                warn!(fqdn = %fqdn, error = %e, "Unparseable job result dropped")
                            }
                        }
                    }
                    Ok(JobStatus::Failed(error)) => {
                        warn!(fqdn = %fqdn, error = %error, "Check job failed");
                    }
                    Ok(JobStatus::Pending) => still_pending.push((fqdn, handle)),
                    Err(e) => {
                        debug!(fqdn = %fqdn, error = %e, "Status poll failed, retrying");
                        still_pending.push((fqdn, handle));
                    }
                }
            }

            pending = still_pending;
            if !pending.is_empty() {
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        }

        if !pending.is_empty() {
            debug!(abandoned = pending.len(), "Deadline reached with jobs still pending");
        }

        harvested
    }

    /// Write a queue snapshot without blocking the request.
    fn spawn_snapshot(&self) {
        let queue = self.queue.clone();
        let telemetry = self.telemetry.clone();
        tokio::spawn(async move {
            let depth = match queue.queue_depth().await {
                Ok(depth) => depth,
                Err(e) => {
                    debug!(error = %e, "Queue depth sample failed");
                    return;
                }
            };
            let active_workers = telemetry.active_workers().await.unwrap_or(0);
            let snapshot = QueueSnapshot {
                timestamp: Utc::now(),
                queue_depth: depth,
                active_workers,
            };
            if let Err(e) = telemetry.record_snapshot(&snapshot).await {
                warn!(error = %e, "Failed to record queue snapshot");
            }
        });
    }
}
