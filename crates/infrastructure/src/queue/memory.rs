use async_trait::async_trait;
use namesmith_application::ports::{
    ClaimedJob, JobConsumer, JobFunc, JobHandle, JobSpec, JobStatus, WorkQueue,
};
use namesmith_domain::DomainError;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Notify;
use uuid::Uuid;

struct QueuedJob {
    id: String,
    func: JobFunc,
    args: Value,
    timeout: Duration,
}

enum StoredResult {
    Finished(Value),
    Failed(String),
}

#[derive(Default)]
struct Inner {
    queue: VecDeque<QueuedJob>,
    results: HashMap<String, StoredResult>,
    locks: HashMap<String, tokio::time::Instant>,
}

/// Deterministic in-process queue with the same contract as the Redis
/// implementation. Lock expiry runs on the tokio clock so tests can pause
/// and advance time.
pub struct InMemoryWorkQueue {
    inner: Mutex<Inner>,
    notify: Notify,
}

impl InMemoryWorkQueue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            notify: Notify::new(),
        }
    }
}

impl Default for InMemoryWorkQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkQueue for InMemoryWorkQueue {
    async fn enqueue(&self, spec: JobSpec) -> Result<JobHandle, DomainError> {
        let id = Uuid::new_v4().to_string();
        {
            let mut inner = self.inner.lock().unwrap();
            inner.queue.push_back(QueuedJob {
                id: id.clone(),
                func: spec.func,
                args: spec.args,
                timeout: spec.timeout,
            });
        }
        self.notify.notify_one();
        Ok(JobHandle(id))
    }

    async fn job_status(&self, handle: &JobHandle) -> Result<JobStatus, DomainError> {
        let inner = self.inner.lock().unwrap();
        match inner.results.get(&handle.0) {
            Some(StoredResult::Finished(value)) => Ok(JobStatus::Finished(value.clone())),
            Some(StoredResult::Failed(error)) => Ok(JobStatus::Failed(error.clone())),
            None => Ok(JobStatus::Pending),
        }
    }

    async fn queue_depth(&self) -> Result<u64, DomainError> {
        Ok(self.inner.lock().unwrap().queue.len() as u64)
    }

    async fn set_if_absent(&self, key: &str, ttl: Duration) -> Result<bool, DomainError> {
        let mut inner = self.inner.lock().unwrap();
        let now = tokio::time::Instant::now();
        match inner.locks.get(key) {
            Some(expiry) if *expiry > now => Ok(false),
            _ => {
                inner.locks.insert(key.to_string(), now + ttl);
                Ok(true)
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        self.inner.lock().unwrap().locks.remove(key);
        Ok(())
    }
}

#[async_trait]
impl JobConsumer for InMemoryWorkQueue {
    async fn claim(&self, poll_timeout: Duration) -> Result<Option<ClaimedJob>, DomainError> {
        let deadline = tokio::time::Instant::now() + poll_timeout;
        loop {
            {
                let mut inner = self.inner.lock().unwrap();
                if let Some(job) = inner.queue.pop_front() {
                    return Ok(Some(ClaimedJob {
                        handle: JobHandle(job.id),
                        func: job.func,
                        args: job.args,
                        timeout: job.timeout,
                    }));
                }
            }
            if tokio::time::Instant::now() >= deadline {
                return Ok(None);
            }
            // A notify that raced ahead of us is stored as a permit.
            let _ = tokio::time::timeout_at(deadline, self.notify.notified()).await;
        }
    }

    async fn complete(&self, job: &ClaimedJob, result: Value) -> Result<(), DomainError> {
        self.inner
            .lock()
            .unwrap()
            .results
            .insert(job.handle.0.clone(), StoredResult::Finished(result));
        Ok(())
    }

    async fn fail(&self, job: &ClaimedJob, error: &str) -> Result<(), DomainError> {
        self.inner
            .lock()
            .unwrap()
            .results
            .insert(job.handle.0.clone(), StoredResult::Failed(error.to_string()));
        Ok(())
    }
}
