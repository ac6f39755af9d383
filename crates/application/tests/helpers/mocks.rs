#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use namesmith_application::ports::{
    DomainRepository, EventSink, GeneratedBatch, GenerationRequest, JobHandle, JobSpec, JobStatus,
    SuggestionEntry, SuggestionGenerator, SuggestionRepository, TokenUsage, WorkQueue,
    WorkerTelemetryRepository, WorkerUpdate,
};
use namesmith_domain::{
    CandidateDomain, CheckResult, CheckStatus, DomainError, DomainRecord, DomainStatus,
    QueueSnapshot, Suggestion, SuggestionMetrics,
};
use serde_json::Value;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

// ── MockGenerator ─────────────────────────────────────────────────────────────

pub struct MockGenerator {
    script: Mutex<VecDeque<Result<Vec<String>, DomainError>>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
        }
    }

    pub fn push_batch(&self, domains: &[&str]) {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(domains.iter().map(|d| d.to_string()).collect()));
    }

    pub fn push_error(&self, error: DomainError) {
        self.script.lock().unwrap().push_back(Err(error));
    }
}

#[async_trait]
impl SuggestionGenerator for MockGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<GeneratedBatch, DomainError> {
        let scripted = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .expect("generator script exhausted");
        scripted.map(|domains| GeneratedBatch {
            domains,
            usage: TokenUsage {
                total: 30,
                prompt: 20,
                completion: 10,
            },
        })
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}

// ── MockWorkQueue ─────────────────────────────────────────────────────────────

enum JobState {
    Pending,
    Finished(Value),
    Failed(String),
}

#[derive(Default)]
struct QueueInner {
    scripted: HashMap<String, VecDeque<CheckStatus>>,
    fail_enqueue: HashSet<String>,
    never_finish: HashSet<String>,
    jobs: HashMap<String, JobState>,
    enqueued: Vec<String>,
    depth: u64,
    locks: HashMap<String, tokio::time::Instant>,
    next_id: u64,
}

/// Queue double whose jobs finish instantly with scripted statuses.
pub struct MockWorkQueue {
    inner: Mutex<QueueInner>,
}

impl MockWorkQueue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(QueueInner::default()),
        }
    }

    /// Queue up the status the next job for `fqdn` reports. Repeated calls
    /// script consecutive checks; the last status repeats thereafter.
    pub fn script_status(&self, fqdn: &str, status: CheckStatus) {
        self.inner
            .lock()
            .unwrap()
            .scripted
            .entry(fqdn.to_string())
            .or_default()
            .push_back(status);
    }

    pub fn fail_enqueue_for(&self, fqdn: &str) {
        self.inner
            .lock()
            .unwrap()
            .fail_enqueue
            .insert(fqdn.to_string());
    }

    pub fn never_finish(&self, fqdn: &str) {
        self.inner
            .lock()
            .unwrap()
            .never_finish
            .insert(fqdn.to_string());
    }

    pub fn set_depth(&self, depth: u64) {
        self.inner.lock().unwrap().depth = depth;
    }

    pub fn enqueued_fqdns(&self) -> Vec<String> {
        self.inner.lock().unwrap().enqueued.clone()
    }
}

#[async_trait]
impl WorkQueue for MockWorkQueue {
    async fn enqueue(&self, spec: JobSpec) -> Result<JobHandle, DomainError> {
        let fqdn = spec.args["domain"]
            .as_str()
            .unwrap_or_default()
            .to_string();

        let mut inner = self.inner.lock().unwrap();
        if inner.fail_enqueue.contains(&fqdn) {
            return Err(DomainError::QueueUnavailable("mock enqueue failure".into()));
        }

        inner.next_id += 1;
        let id = format!("job-{}", inner.next_id);
        inner.enqueued.push(fqdn.clone());

        let state = if inner.never_finish.contains(&fqdn) {
            JobState::Pending
        } else {
            let status = match inner.scripted.get_mut(&fqdn) {
                Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
                Some(queue) => *queue.front().expect("scripted queue empty"),
                None => CheckStatus::NonConclusive,
            };
            let result = CheckResult {
                fqdn: fqdn.clone(),
                status,
                worker_id: "mock-worker:1".to_string(),
                processing_ms: 5,
                queue_wait_ms: 2,
            };
            JobState::Finished(serde_json::to_value(result).unwrap())
        };
        inner.jobs.insert(id.clone(), state);
        Ok(JobHandle(id))
    }

    async fn job_status(&self, handle: &JobHandle) -> Result<JobStatus, DomainError> {
        let inner = self.inner.lock().unwrap();
        match inner.jobs.get(&handle.0) {
            Some(JobState::Pending) => Ok(JobStatus::Pending),
            Some(JobState::Finished(value)) => Ok(JobStatus::Finished(value.clone())),
            Some(JobState::Failed(error)) => Ok(JobStatus::Failed(error.clone())),
            None => Err(DomainError::QueueProtocol(format!(
                "unknown job {}",
                handle.0
            ))),
        }
    }

    async fn queue_depth(&self) -> Result<u64, DomainError> {
        Ok(self.inner.lock().unwrap().depth)
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

// ── MockDomainRepository ──────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockDomainRepository {
    records: Mutex<HashMap<String, DomainRecord>>,
}

impl MockDomainRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_record(&self, record: DomainRecord) {
        self.records
            .lock()
            .unwrap()
            .insert(record.fqdn.clone(), record);
    }

    pub fn all(&self) -> Vec<DomainRecord> {
        self.records.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl DomainRepository for MockDomainRepository {
    async fn get(&self, fqdn: &str) -> Result<Option<DomainRecord>, DomainError> {
        Ok(self.records.lock().unwrap().get(fqdn).cloned())
    }

    async fn upsert_status(
        &self,
        candidate: &CandidateDomain,
        status: DomainStatus,
        suggestion_id: Option<i64>,
    ) -> Result<DomainRecord, DomainError> {
        let mut records = self.records.lock().unwrap();
        let now = Utc::now();
        let record = records
            .entry(candidate.fqdn.clone())
            .and_modify(|r| {
                r.status = status;
                r.last_checked = Some(now);
                r.updated_at = now;
                if r.suggestion_id.is_none() {
                    r.suggestion_id = suggestion_id;
                }
            })
            .or_insert_with(|| DomainRecord {
                fqdn: candidate.fqdn.clone(),
                registrable_part: candidate.registrable_part.clone(),
                public_suffix: candidate.public_suffix.clone(),
                status,
                last_checked: Some(now),
                created_at: now,
                updated_at: now,
                suggestion_id,
            });
        Ok(record.clone())
    }

    async fn find_stale(
        &self,
        older_than: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<DomainRecord>, DomainError> {
        let records = self.records.lock().unwrap();
        let mut stale: Vec<DomainRecord> = records
            .values()
            .filter(|r| match r.last_checked {
                None => true,
                Some(checked) => checked < older_than,
            })
            .cloned()
            .collect();
        stale.sort_by_key(|r| r.last_checked);
        stale.truncate(limit as usize);
        Ok(stale)
    }

    async fn mark_checked(&self, fqdn: &str, status: DomainStatus) -> Result<(), DomainError> {
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.get_mut(fqdn) {
            let now = Utc::now();
            record.status = status;
            record.last_checked = Some(now);
            record.updated_at = now;
        }
        Ok(())
    }
}

// ── MockSuggestionRepository ──────────────────────────────────────────────────

#[derive(Default)]
pub struct MockSuggestionRepository {
    suggestions: Mutex<Vec<Suggestion>>,
    metrics: Mutex<Vec<(i64, SuggestionMetrics)>>,
}

impl MockSuggestionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn suggestions(&self) -> Vec<Suggestion> {
        self.suggestions.lock().unwrap().clone()
    }

    pub fn saved_metrics(&self) -> Vec<(i64, SuggestionMetrics)> {
        self.metrics.lock().unwrap().clone()
    }
}

#[async_trait]
impl SuggestionRepository for MockSuggestionRepository {
    async fn create(&self, suggestion: &Suggestion) -> Result<i64, DomainError> {
        let mut suggestions = self.suggestions.lock().unwrap();
        let id = suggestions.len() as i64 + 1;
        let mut row = suggestion.clone();
        row.id = Some(id);
        row.created_at = Some(Utc::now());
        suggestions.push(row);
        Ok(id)
    }

    async fn save_metrics(
        &self,
        suggestion_id: i64,
        metrics: &SuggestionMetrics,
    ) -> Result<(), DomainError> {
        self.metrics
            .lock()
            .unwrap()
            .push((suggestion_id, metrics.clone()));
        Ok(())
    }
}

// ── MockTelemetryRepository ───────────────────────────────────────────────────

#[derive(Default)]
pub struct MockTelemetryRepository {
    updates: Mutex<Vec<WorkerUpdate>>,
    snapshots: Mutex<Vec<QueueSnapshot>>,
}

impl MockTelemetryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<WorkerUpdate> {
        self.updates.lock().unwrap().clone()
    }

    pub fn snapshots(&self) -> Vec<QueueSnapshot> {
        self.snapshots.lock().unwrap().clone()
    }
}

#[async_trait]
impl WorkerTelemetryRepository for MockTelemetryRepository {
    async fn accumulate(&self, updates: &[WorkerUpdate]) -> Result<(), DomainError> {
        self.updates.lock().unwrap().extend(updates.iter().cloned());
        Ok(())
    }

    async fn record_snapshot(&self, snapshot: &QueueSnapshot) -> Result<(), DomainError> {
        self.snapshots.lock().unwrap().push(snapshot.clone());
        Ok(())
    }

    async fn active_workers(&self) -> Result<u32, DomainError> {
        Ok(1)
    }
}

// ── RecordingSink ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum RecordedEvent {
    Started,
    Suggestions {
        new: Vec<SuggestionEntry>,
        updates: Vec<SuggestionEntry>,
        available_count: u32,
        total: u32,
    },
    Completed(Vec<SuggestionEntry>),
    Failed(String),
}

/// Sink that records every event; can simulate a client that disconnects
/// after a fixed number of events.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<RecordedEvent>,
    pub fail_after: Option<usize>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disconnect_after(events: usize) -> Self {
        Self {
            events: Vec::new(),
            fail_after: Some(events),
        }
    }

    fn push(&mut self, event: RecordedEvent) -> Result<(), DomainError> {
        if let Some(limit) = self.fail_after {
            if self.events.len() >= limit {
                return Err(DomainError::Internal("client disconnected".into()));
            }
        }
        self.events.push(event);
        Ok(())
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn started(&mut self) -> Result<(), DomainError> {
        self.push(RecordedEvent::Started)
    }

    async fn suggestions(
        &mut self,
        new: &[SuggestionEntry],
        updates: &[SuggestionEntry],
        available_count: u32,
        total: u32,
    ) -> Result<(), DomainError> {
        self.push(RecordedEvent::Suggestions {
            new: new.to_vec(),
            updates: updates.to_vec(),
            available_count,
            total,
        })
    }

    async fn completed(&mut self, entries: &[SuggestionEntry]) -> Result<(), DomainError> {
        self.push(RecordedEvent::Completed(entries.to_vec()))
    }

    async fn failed(&mut self, error: &DomainError) -> Result<(), DomainError> {
        self.push(RecordedEvent::Failed(error.code().to_string()))
    }
}
