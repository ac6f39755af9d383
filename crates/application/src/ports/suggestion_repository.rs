use async_trait::async_trait;
use namesmith_domain::{DomainError, Suggestion, SuggestionMetrics};

#[async_trait]
pub trait SuggestionRepository: Send + Sync {
    /// Insert the immutable suggestion row, returning its id.
    async fn create(&self, suggestion: &Suggestion) -> Result<i64, DomainError>;

    /// Write the one-to-one metrics row. Called exactly once per request.
    async fn save_metrics(
        &self,
        suggestion_id: i64,
        metrics: &SuggestionMetrics,
    ) -> Result<(), DomainError>;
}
