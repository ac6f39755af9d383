use async_trait::async_trait;
use namesmith_domain::{DomainError, QueueSnapshot};

/// Per-worker timing totals folded out of one dispatched batch.
#[derive(Debug, Clone, Default)]
pub struct WorkerUpdate {
    pub worker_id: String,
    pub jobs: u64,
    pub processing_ms: u64,
    pub queue_wait_ms: u64,
}

/// Queue and worker telemetry. All writes are additive or append-only, so
/// no compare-and-set is needed anywhere.
#[async_trait]
pub trait WorkerTelemetryRepository: Send + Sync {
    async fn accumulate(&self, updates: &[WorkerUpdate]) -> Result<(), DomainError>;

    /// Append a queue snapshot and opportunistically prune old ones.
    async fn record_snapshot(&self, snapshot: &QueueSnapshot) -> Result<(), DomainError>;

    /// Workers seen recently enough to be considered live.
    async fn active_workers(&self) -> Result<u32, DomainError>;
}
