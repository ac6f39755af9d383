use async_trait::async_trait;
use namesmith_domain::{DomainError, PromptType, SimilarContext, UserPreferences};

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub description: String,
    pub target_count: u32,
    pub prompt_type: PromptType,
    pub preferences: Option<UserPreferences>,
    pub similar_to: Option<SimilarContext>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokenUsage {
    pub total: u64,
    pub prompt: u64,
    pub completion: u64,
}

/// One generation round: sanitized, deduplicated candidate names in the
/// order the model produced them, plus token accounting.
#[derive(Debug, Clone)]
pub struct GeneratedBatch {
    pub domains: Vec<String>,
    pub usage: TokenUsage,
}

#[async_trait]
pub trait SuggestionGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedBatch, DomainError>;

    /// Model identifier persisted on suggestion rows.
    fn model(&self) -> &str;
}
