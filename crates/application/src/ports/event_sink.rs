use async_trait::async_trait;
use chrono::{DateTime, Utc};
use namesmith_domain::{DomainError, DomainStatus};
use serde::Serialize;

/// One accumulated suggestion as surfaced to clients.
#[derive(Debug, Clone, Serialize)]
pub struct SuggestionEntry {
    pub domain: String,
    pub tld: String,
    pub status: DomainStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Where the orchestrator emits progress.
///
/// The streaming path forwards events to the client as SSE frames; the
/// batch path uses [`BufferingSink`], which swallows them. An `Err` from
/// any method means the client is gone: the orchestrator abandons the loop
/// at the next emission point and still flushes metrics best-effort.
#[async_trait]
pub trait EventSink: Send {
    async fn started(&mut self) -> Result<(), DomainError>;

    async fn suggestions(
        &mut self,
        new: &[SuggestionEntry],
        updates: &[SuggestionEntry],
        available_count: u32,
        total: u32,
    ) -> Result<(), DomainError>;

    async fn completed(&mut self, entries: &[SuggestionEntry]) -> Result<(), DomainError>;

    async fn failed(&mut self, error: &DomainError) -> Result<(), DomainError>;
}

/// Sink for the buffered (non-streaming) response path. The loop result is
/// returned to the caller directly, so intermediate events go nowhere.
#[derive(Debug, Default)]
pub struct BufferingSink;

#[async_trait]
impl EventSink for BufferingSink {
    async fn started(&mut self) -> Result<(), DomainError> {
        Ok(())
    }

    async fn suggestions(
        &mut self,
        _new: &[SuggestionEntry],
        _updates: &[SuggestionEntry],
        _available_count: u32,
        _total: u32,
    ) -> Result<(), DomainError> {
        Ok(())
    }

    async fn completed(&mut self, _entries: &[SuggestionEntry]) -> Result<(), DomainError> {
        Ok(())
    }

    async fn failed(&mut self, _error: &DomainError) -> Result<(), DomainError> {
        Ok(())
    }
}
