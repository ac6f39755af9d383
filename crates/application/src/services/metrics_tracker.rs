use crate::ports::{SuggestionRepository, TokenUsage};
use namesmith_domain::{DomainStatus, SuggestionMetrics};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Instant;
use tracing::warn;

/// Per-request span and counter accumulator.
///
/// All mutating methods are O(1) and lock a plain mutex, so the tracker can
/// be shared between the request task and fire-and-forget persistence. The
/// record is computed and written once via [`MetricsTracker::save`].
pub struct MetricsTracker {
    request_start: Instant,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    timers: HashMap<String, Instant>,
    llm_durations_ms: Vec<u64>,
    worker_durations_ms: Vec<u64>,
    time_to_first_ms: Option<u64>,

    retry_count: u32,
    llm_call_count: u32,
    worker_job_count: u32,

    total_domains_generated: u32,
    unique_domains: HashSet<String>,
    available: u32,
    registered: u32,
    unknown: u32,

    llm_tokens_total: u64,
    llm_tokens_prompt: u64,
    llm_tokens_completion: u64,

    errors: Vec<String>,
    queue_depth_at_start: Option<u64>,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self {
            request_start: Instant::now(),
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn start_timer(&self, name: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.timers.insert(name.to_string(), Instant::now());
    }

    /// Stop a named timer, recording a per-attempt duration for the
    /// `llm` and `worker` buckets.
    pub fn stop_timer(&self, name: &str) -> Option<u64> {
        let mut inner = self.inner.lock().unwrap();
        let started = inner.timers.remove(name)?;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match name {
            "llm" => inner.llm_durations_ms.push(elapsed_ms),
            "worker" => inner.worker_durations_ms.push(elapsed_ms),
            _ => {}
        }
        Some(elapsed_ms)
    }

    pub fn increment_retry(&self) {
        self.inner.lock().unwrap().retry_count += 1;
    }

    pub fn increment_llm_call(&self) {
        self.inner.lock().unwrap().llm_call_count += 1;
    }

    pub fn add_worker_jobs(&self, count: u32) {
        self.inner.lock().unwrap().worker_job_count += count;
    }

    pub fn add_domains_generated(&self, domains: &[String]) {
        let mut inner = self.inner.lock().unwrap();
        inner.total_domains_generated += domains.len() as u32;
        for domain in domains {
            inner.unique_domains.insert(domain.clone());
        }
    }

    pub fn add_domain_status(&self, status: DomainStatus) {
        let mut inner = self.inner.lock().unwrap();
        inner.bump(status, 1);
    }

    /// Shift a count between statuses when an accumulated entry upgrades,
    /// keeping per-status counts summing to the number of entries returned.
    pub fn replace_domain_status(&self, old: DomainStatus, new: DomainStatus) {
        let mut inner = self.inner.lock().unwrap();
        inner.bump(old, -1);
        inner.bump(new, 1);
    }

    pub fn add_llm_tokens(&self, usage: TokenUsage) {
        let mut inner = self.inner.lock().unwrap();
        inner.llm_tokens_total += usage.total;
        inner.llm_tokens_prompt += usage.prompt;
        inner.llm_tokens_completion += usage.completion;
    }

    pub fn add_error(&self, message: impl Into<String>) {
        self.inner.lock().unwrap().errors.push(message.into());
    }

    /// Stamp time-to-first-suggestion. Idempotent.
    pub fn mark_first_suggestion(&self) {
        let mut inner = self.inner.lock().unwrap();
        if inner.time_to_first_ms.is_none() {
            inner.time_to_first_ms = Some(self.request_start.elapsed().as_millis() as u64);
        }
    }

    pub fn set_queue_depth(&self, depth: u64) {
        self.inner.lock().unwrap().queue_depth_at_start = Some(depth);
    }

    /// Build the metrics record for persistence.
    pub fn snapshot(&self, target_count: u32) -> SuggestionMetrics {
        let inner = self.inner.lock().unwrap();
        let domains_returned = inner.available + inner.registered + inner.unknown;
        let success_rate = if target_count > 0 {
            (f64::from(inner.available) / f64::from(target_count)).min(1.0)
        } else {
            0.0
        };

        SuggestionMetrics {
            total_duration_ms: self.request_start.elapsed().as_millis() as u64,
            llm_total_duration_ms: sum_nonempty(&inner.llm_durations_ms),
            worker_total_duration_ms: sum_nonempty(&inner.worker_durations_ms),
            time_to_first_suggestion_ms: inner.time_to_first_ms,
            llm_attempt_durations_ms: inner.llm_durations_ms.clone(),
            worker_attempt_durations_ms: inner.worker_durations_ms.clone(),
            retry_count: inner.retry_count,
            llm_call_count: inner.llm_call_count,
            worker_job_count: inner.worker_job_count,
            total_domains_generated: inner.total_domains_generated,
            unique_domains_generated: inner.unique_domains.len() as u32,
            domains_returned,
            available_count: inner.available,
            registered_count: inner.registered,
            unknown_count: inner.unknown,
            success_rate,
            reached_target: inner.available >= target_count,
            llm_tokens_total: nonzero(inner.llm_tokens_total),
            llm_tokens_prompt: nonzero(inner.llm_tokens_prompt),
            llm_tokens_completion: nonzero(inner.llm_tokens_completion),
            error_count: inner.errors.len() as u32,
            error_messages: inner.errors.clone(),
            queue_depth_at_start: inner.queue_depth_at_start,
        }
    }

    /// Persist the metrics record. Failures are logged, never propagated:
    /// telemetry must not take down a request.
    pub async fn save(
        &self,
        repo: &dyn SuggestionRepository,
        suggestion_id: i64,
        target_count: u32,
    ) {
        let metrics = self.snapshot(target_count);
        if let Err(e) = repo.save_metrics(suggestion_id, &metrics).await {
            warn!(error = %e, suggestion_id, "Failed to save suggestion metrics");
        }
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl Inner {
    fn bump(&mut self, status: DomainStatus, delta: i32) {
        let slot = match status {
            DomainStatus::Available => &mut self.available,
            DomainStatus::Registered => &mut self.registered,
            DomainStatus::Unknown => &mut self.unknown,
        };
        *slot = slot.saturating_add_signed(delta);
    }
}

fn sum_nonempty(durations: &[u64]) -> Option<u64> {
    if durations.is_empty() {
        None
    } else {
        Some(durations.iter().sum())
    }
}

fn nonzero(value: u64) -> Option<u64> {
    if value > 0 {
        Some(value)
    } else {
        None
    }
}
