use crate::dto::DomainSuggestionResponse;
use async_trait::async_trait;
use axum::response::sse::Event;
use namesmith_application::ports::{EventSink, SuggestionEntry};
use namesmith_domain::DomainError;
use serde_json::json;
use tokio::sync::mpsc;

/// Event sink that forwards orchestrator progress as SSE frames.
///
/// When the receiver is dropped (client hung up), sends fail and the
/// orchestrator abandons the loop at its next emission point.
pub struct ChannelEventSink {
    tx: mpsc::Sender<Event>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<Event>) -> Self {
        Self { tx }
    }

    async fn send(&self, name: &'static str, payload: serde_json::Value) -> Result<(), DomainError> {
        let event = Event::default()
            .event(name)
            .json_data(&payload)
            .map_err(|e| DomainError::Internal(format!("unserializable event: {e}")))?;
        self.tx
            .send(event)
            .await
            .map_err(|_| DomainError::Internal("client disconnected".to_string()))
    }
}

fn to_dtos(entries: &[SuggestionEntry]) -> Vec<DomainSuggestionResponse> {
    entries.iter().map(DomainSuggestionResponse::from_entry).collect()
}

#[async_trait]
impl EventSink for ChannelEventSink {
    async fn started(&mut self) -> Result<(), DomainError> {
        self.send("start", json!({ "status": "started" })).await
    }

    async fn suggestions(
        &mut self,
        new: &[SuggestionEntry],
        updates: &[SuggestionEntry],
        available_count: u32,
        total: u32,
    ) -> Result<(), DomainError> {
        self.send(
            "suggestions",
            json!({
                "new": to_dtos(new),
                "updates": to_dtos(updates),
                "available_count": available_count,
                "total": total,
            }),
        )
        .await
    }

    async fn completed(&mut self, entries: &[SuggestionEntry]) -> Result<(), DomainError> {
        self.send(
            "complete",
            json!({
                "suggestions": to_dtos(entries),
                "total": entries.len(),
            }),
        )
        .await
    }

    async fn failed(&mut self, error: &DomainError) -> Result<(), DomainError> {
        self.send(
            "error",
            json!({
                "code": error.code(),
                "message": error.user_message(),
                "details": error.to_string(),
                "retry_allowed": error.retry_allowed(),
            }),
        )
        .await
    }
}
