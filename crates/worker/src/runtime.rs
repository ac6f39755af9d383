use crate::handlers::{
    handle_check_domain, handle_recheck_batch, worker_id, CheckDomainArgs, RecheckBatchArgs,
};
use namesmith_application::ports::{
    ClaimedJob, DomainProber, DomainRepository, JobConsumer, JobFunc,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const CLAIM_POLL: Duration = Duration::from_secs(1);

/// Tracks when this worker last finished a job. The recheck supervisor
/// reads it to decide whether the worker has been idle long enough.
pub struct IdleClock {
    last_activity: Mutex<tokio::time::Instant>,
}

impl IdleClock {
    pub fn new() -> Self {
        Self {
            last_activity: Mutex::new(tokio::time::Instant::now()),
        }
    }

    pub fn touch(&self) {
        *self.last_activity.lock().unwrap() = tokio::time::Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        tokio::time::Instant::now() - *self.last_activity.lock().unwrap()
    }
}

impl Default for IdleClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle of the worker process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Starting,
    Idle,
    Busy,
    Draining,
    Stopped,
}

/// One queue consumer executing check jobs with bounded parallelism.
///
/// Jobs are isolated: there is no shared mutable state between concurrent
/// probes beyond the permit pool and the idle clock.
pub struct WorkerRuntime {
    consumer: Arc<dyn JobConsumer>,
    prober: Arc<dyn DomainProber>,
    domains: Arc<dyn DomainRepository>,
    semaphore: Arc<Semaphore>,
    idle_clock: Arc<IdleClock>,
    max_concurrent: usize,
    worker_id: String,
    in_flight: Arc<AtomicUsize>,
    state: Arc<Mutex<WorkerState>>,
}

impl WorkerRuntime {
    pub fn new(
        consumer: Arc<dyn JobConsumer>,
        prober: Arc<dyn DomainProber>,
        domains: Arc<dyn DomainRepository>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            consumer,
            prober,
            domains,
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            idle_clock: Arc::new(IdleClock::new()),
            max_concurrent,
            worker_id: worker_id(),
            in_flight: Arc::new(AtomicUsize::new(0)),
            state: Arc::new(Mutex::new(WorkerState::Starting)),
        }
    }

    /// The clock shared with the idle-recheck supervisor.
    pub fn idle_clock(&self) -> Arc<IdleClock> {
        self.idle_clock.clone()
    }

    pub fn state(&self) -> WorkerState {
        *self.state.lock().unwrap()
    }

    fn set_state(&self, state: WorkerState) {
        let mut current = self.state.lock().unwrap();
        if *current != state {
            debug!(from = ?*current, to = ?state, "Worker state transition");
            *current = state;
        }
    }

    /// Claim and execute jobs until `shutdown` fires, then drain in-flight
    /// probes before returning.
    pub async fn run(&self, shutdown: CancellationToken) {
        info!(
            worker_id = %self.worker_id,
            max_concurrent = self.max_concurrent,
            "Worker starting"
        );
        self.set_state(WorkerState::Idle);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                claimed = self.consumer.claim(CLAIM_POLL) => match claimed {
                    Ok(Some(job)) => self.dispatch(job).await,
                    Ok(None) => continue,
                    Err(e) => {
                        warn!(error = %e, "Queue claim failed, backing off");
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                },
            }
        }

        self.set_state(WorkerState::Draining);
        info!(
            in_flight = self.in_flight.load(Ordering::SeqCst),
            "Worker draining"
        );
        // All permits back means all spawned jobs are done.
        let _ = self
            .semaphore
            .acquire_many(self.max_concurrent as u32)
            .await;
        self.set_state(WorkerState::Stopped);
        info!(worker_id = %self.worker_id, "Worker stopped");
    }

    async fn dispatch(&self, job: ClaimedJob) {
        let Ok(permit) = self.semaphore.clone().acquire_owned().await else {
            return;
        };
        self.set_state(WorkerState::Busy);
        self.in_flight.fetch_add(1, Ordering::SeqCst);

        let consumer = self.consumer.clone();
        let prober = self.prober.clone();
        let domains = self.domains.clone();
        let max_concurrent = self.max_concurrent;
        let idle_clock = self.idle_clock.clone();
        let in_flight = self.in_flight.clone();
        let state = self.state.clone();
        let worker_id = self.worker_id.clone();

        tokio::spawn(async move {
            let execution = execute_job(&job, &*prober, &*domains, max_concurrent, &worker_id);
            let outcome = match tokio::time::timeout(job.timeout, execution).await {
                Ok(outcome) => outcome,
                Err(_) => Err(format!("job exceeded its {:?} timeout", job.timeout)),
            };

            let report = match outcome {
                Ok(result) => consumer.complete(&job, result).await,
                Err(error) => {
                    warn!(job = %job.handle.0, error = %error, "Job failed");
                    consumer.fail(&job, &error).await
                }
            };
            if let Err(e) = report {
                error!(job = %job.handle.0, error = %e, "Failed to report job outcome");
            }

            idle_clock.touch();
            if in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
                let mut state = state.lock().unwrap();
                if *state == WorkerState::Busy {
                    *state = WorkerState::Idle;
                }
            }
            drop(permit);
        });
    }
}

async fn execute_job(
    job: &ClaimedJob,
    prober: &dyn DomainProber,
    domains: &dyn DomainRepository,
    max_concurrent: usize,
    worker_id: &str,
) -> Result<serde_json::Value, String> {
    match job.func {
        JobFunc::CheckDomain => {
            let args: CheckDomainArgs = serde_json::from_value(job.args.clone())
                .map_err(|e| format!("bad {} args: {e}", job.func.as_str()))?;
            let result = handle_check_domain(prober, worker_id, args).await;
            serde_json::to_value(result).map_err(|e| e.to_string())
        }
        JobFunc::RecheckBatch => {
            let args: RecheckBatchArgs = serde_json::from_value(job.args.clone())
                .map_err(|e| format!("bad {} args: {e}", job.func.as_str()))?;
            let outcomes = handle_recheck_batch(prober, domains, max_concurrent, args).await;
            serde_json::to_value(outcomes).map_err(|e| e.to_string())
        }
    }
}
