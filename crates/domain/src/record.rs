use crate::check::DomainStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persistent record of a domain the system has seen, keyed by full name.
///
/// `status` always reflects the most recent check result; `last_checked`
/// only moves forward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainRecord {
    pub fqdn: String,
    pub registrable_part: String,
    pub public_suffix: String,
    pub status: DomainStatus,
    pub last_checked: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub suggestion_id: Option<i64>,
}

/// One user-facing suggestion request. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: Option<i64>,
    pub description: String,
    pub target_count: u32,
    pub model: String,
    pub prompt_id: String,
    pub user_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Per-request performance metrics, one-to-one with a suggestion.
/// Written exactly once when the orchestrator reaches a terminal state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuggestionMetrics {
    pub total_duration_ms: u64,
    pub llm_total_duration_ms: Option<u64>,
    pub worker_total_duration_ms: Option<u64>,
    pub time_to_first_suggestion_ms: Option<u64>,
    pub llm_attempt_durations_ms: Vec<u64>,
    pub worker_attempt_durations_ms: Vec<u64>,

    pub retry_count: u32,
    pub llm_call_count: u32,
    pub worker_job_count: u32,

    pub total_domains_generated: u32,
    pub unique_domains_generated: u32,
    pub domains_returned: u32,
    pub available_count: u32,
    pub registered_count: u32,
    pub unknown_count: u32,

    pub success_rate: f64,
    pub reached_target: bool,

    pub llm_tokens_total: Option<u64>,
    pub llm_tokens_prompt: Option<u64>,
    pub llm_tokens_completion: Option<u64>,

    pub error_count: u32,
    pub error_messages: Vec<String>,

    pub queue_depth_at_start: Option<u64>,
}

/// Cumulative per-worker counters, updated additively after each batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerMetrics {
    pub worker_id: String,
    pub total_jobs: u64,
    pub total_processing_ms: u64,
    pub total_queue_wait_ms: u64,
    pub last_seen: DateTime<Utc>,
}

/// Point-in-time queue observation, append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueSnapshot {
    pub timestamp: DateTime<Utc>,
    pub queue_depth: u64,
    pub active_workers: u32,
}
