use super::format_ts;
use async_trait::async_trait;
use chrono::Utc;
use namesmith_application::ports::SuggestionRepository;
use namesmith_domain::{DomainError, Suggestion, SuggestionMetrics};
use sqlx::SqlitePool;
use tracing::{error, instrument};

pub struct SqliteSuggestionRepository {
    pool: SqlitePool,
}

impl SqliteSuggestionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SuggestionRepository for SqliteSuggestionRepository {
    #[instrument(skip(self, suggestion), fields(prompt = %suggestion.prompt_id))]
    async fn create(&self, suggestion: &Suggestion) -> Result<i64, DomainError> {
        let result = sqlx::query(
            "INSERT INTO suggestions (description, target_count, model, prompt_id, user_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&suggestion.description)
        .bind(i64::from(suggestion.target_count))
        .bind(&suggestion.model)
        .bind(&suggestion.prompt_id)
        .bind(&suggestion.user_id)
        .bind(format_ts(Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create suggestion");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(result.last_insert_rowid())
    }

    #[instrument(skip(self, metrics))]
    async fn save_metrics(
        &self,
        suggestion_id: i64,
        metrics: &SuggestionMetrics,
    ) -> Result<(), DomainError> {
        let llm_attempts = serde_json::to_string(&metrics.llm_attempt_durations_ms)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let worker_attempts = serde_json::to_string(&metrics.worker_attempt_durations_ms)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let error_messages = serde_json::to_string(&metrics.error_messages)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        sqlx::query(
            "INSERT INTO suggestion_metrics (
                 suggestion_id,
                 total_duration_ms, llm_total_duration_ms, worker_total_duration_ms,
                 time_to_first_suggestion_ms, llm_attempt_durations_ms, worker_attempt_durations_ms,
                 retry_count, llm_call_count, worker_job_count,
                 total_domains_generated, unique_domains_generated, domains_returned,
                 available_domains_count, registered_domains_count, unknown_domains_count,
                 success_rate, reached_target,
                 llm_tokens_total, llm_tokens_prompt, llm_tokens_completion,
                 error_count, error_messages, queue_depth_at_start, created_at
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(suggestion_id)
        .bind(metrics.total_duration_ms as i64)
        .bind(metrics.llm_total_duration_ms.map(|v| v as i64))
        .bind(metrics.worker_total_duration_ms.map(|v| v as i64))
        .bind(metrics.time_to_first_suggestion_ms.map(|v| v as i64))
        .bind(llm_attempts)
        .bind(worker_attempts)
        .bind(i64::from(metrics.retry_count))
        .bind(i64::from(metrics.llm_call_count))
        .bind(i64::from(metrics.worker_job_count))
        .bind(i64::from(metrics.total_domains_generated))
        .bind(i64::from(metrics.unique_domains_generated))
        .bind(i64::from(metrics.domains_returned))
        .bind(i64::from(metrics.available_count))
        .bind(i64::from(metrics.registered_count))
        .bind(i64::from(metrics.unknown_count))
        .bind(metrics.success_rate)
        .bind(i64::from(metrics.reached_target))
        .bind(metrics.llm_tokens_total.map(|v| v as i64))
        .bind(metrics.llm_tokens_prompt.map(|v| v as i64))
        .bind(metrics.llm_tokens_completion.map(|v| v as i64))
        .bind(i64::from(metrics.error_count))
        .bind(error_messages)
        .bind(metrics.queue_depth_at_start.map(|v| v as i64))
        .bind(format_ts(Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to save suggestion metrics");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }
}
