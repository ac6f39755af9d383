use super::format_ts;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use namesmith_application::ports::{WorkerTelemetryRepository, WorkerUpdate};
use namesmith_domain::{DomainError, QueueSnapshot};
use sqlx::{Row, SqlitePool};
use tracing::{error, instrument};

/// Queue snapshots older than this are pruned after each insert.
const SNAPSHOT_RETENTION_HOURS: i64 = 96;
/// A worker silent for longer than this no longer counts as active.
const ACTIVE_WORKER_WINDOW_MINUTES: i64 = 5;

pub struct SqliteWorkerTelemetryRepository {
    pool: SqlitePool,
}

impl SqliteWorkerTelemetryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkerTelemetryRepository for SqliteWorkerTelemetryRepository {
    #[instrument(skip(self, updates), fields(workers = updates.len()))]
    async fn accumulate(&self, updates: &[WorkerUpdate]) -> Result<(), DomainError> {
        let now = format_ts(Utc::now());
        for update in updates {
            sqlx::query(
                "INSERT INTO worker_metrics (worker_id, total_jobs, total_processing_ms, total_queue_wait_ms, last_seen)
                 VALUES (?, ?, ?, ?, ?)
                 ON CONFLICT(worker_id) DO UPDATE SET
                     total_jobs = worker_metrics.total_jobs + excluded.total_jobs,
                     total_processing_ms = worker_metrics.total_processing_ms + excluded.total_processing_ms,
                     total_queue_wait_ms = worker_metrics.total_queue_wait_ms + excluded.total_queue_wait_ms,
                     last_seen = excluded.last_seen",
            )
            .bind(&update.worker_id)
            .bind(update.jobs as i64)
            .bind(update.processing_ms as i64)
            .bind(update.queue_wait_ms as i64)
            .bind(&now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, worker_id = %update.worker_id, "Failed to accumulate worker metrics");
                DomainError::DatabaseError(e.to_string())
            })?;
        }
        Ok(())
    }

    #[instrument(skip(self, snapshot), fields(depth = snapshot.queue_depth))]
    async fn record_snapshot(&self, snapshot: &QueueSnapshot) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO queue_snapshots (timestamp, queue_depth, active_workers) VALUES (?, ?, ?)",
        )
        .bind(format_ts(snapshot.timestamp))
        .bind(snapshot.queue_depth as i64)
        .bind(i64::from(snapshot.active_workers))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to record queue snapshot");
            DomainError::DatabaseError(e.to_string())
        })?;

        let cutoff = format_ts(Utc::now() - ChronoDuration::hours(SNAPSHOT_RETENTION_HOURS));
        sqlx::query("DELETE FROM queue_snapshots WHERE timestamp < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to prune queue snapshots");
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(())
    }

    async fn active_workers(&self) -> Result<u32, DomainError> {
        let cutoff = format_ts(Utc::now() - ChronoDuration::minutes(ACTIVE_WORKER_WINDOW_MINUTES));
        let row = sqlx::query("SELECT COUNT(*) AS n FROM worker_metrics WHERE last_seen > ?")
            .bind(cutoff)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;
        let count: i64 = row.get("n");
        Ok(count as u32)
    }
}
