use async_trait::async_trait;
use namesmith_domain::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Job functions understood by check workers. The serialized names are the
/// queue wire contract and must stay stable across deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobFunc {
    #[serde(rename = "handle_single_domain_check")]
    CheckDomain,
    #[serde(rename = "handle_domain_recheck")]
    RecheckBatch,
}

impl JobFunc {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobFunc::CheckDomain => "handle_single_domain_check",
            JobFunc::RecheckBatch => "handle_domain_recheck",
        }
    }
}

/// One job to be placed on the shared queue. Arguments are opaque JSON at
/// this boundary; producers and consumers agree on the shape per function.
#[derive(Debug, Clone)]
pub struct JobSpec {
    pub func: JobFunc,
    pub args: Value,
    pub timeout: Duration,
}

/// Opaque reference to an enqueued job.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobHandle(pub String);

#[derive(Debug, Clone)]
pub enum JobStatus {
    Pending,
    Finished(Value),
    Failed(String),
}

/// The four producer-side queue primitives the API core depends on.
///
/// `set_if_absent` is the building block for the cross-worker recheck lock:
/// it must be atomic and must expire on its own so a dead holder cannot
/// wedge the sweep. Connection failures surface as
/// [`DomainError::QueueUnavailable`] (transient, caller may retry);
/// malformed payloads as [`DomainError::QueueProtocol`] (fatal).
#[async_trait]
pub trait WorkQueue: Send + Sync {
    async fn enqueue(&self, spec: JobSpec) -> Result<JobHandle, DomainError>;

    async fn job_status(&self, handle: &JobHandle) -> Result<JobStatus, DomainError>;

    async fn queue_depth(&self) -> Result<u64, DomainError>;

    /// Set `key` only if it does not exist, expiring after `ttl`.
    /// Returns whether this caller won the key.
    async fn set_if_absent(&self, key: &str, ttl: Duration) -> Result<bool, DomainError>;

    async fn delete(&self, key: &str) -> Result<(), DomainError>;
}

/// A job claimed by a worker process.
#[derive(Debug, Clone)]
pub struct ClaimedJob {
    pub handle: JobHandle,
    pub func: JobFunc,
    pub args: Value,
    pub timeout: Duration,
}

/// Worker-side queue consumption. Claiming is atomic: a job is delivered to
/// exactly one consumer; there is no ordering guarantee between jobs.
#[async_trait]
pub trait JobConsumer: Send + Sync {
    /// Block up to `poll_timeout` waiting for a job.
    async fn claim(&self, poll_timeout: Duration) -> Result<Option<ClaimedJob>, DomainError>;

    async fn complete(&self, job: &ClaimedJob, result: Value) -> Result<(), DomainError>;

    async fn fail(&self, job: &ClaimedJob, error: &str) -> Result<(), DomainError>;
}
