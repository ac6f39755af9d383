use chrono::{DateTime, Utc};
use namesmith_application::ports::SuggestionEntry;
use namesmith_application::use_cases::SuggestRequest;
use namesmith_domain::{DomainError, DomainStatus, PromptType};
use serde::{Deserialize, Serialize};

const MAX_TARGET_COUNT: u32 = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct SuggestDomainsRequest {
    pub description: String,
    #[serde(default = "default_count")]
    pub count: u32,
    pub user_id: Option<String>,
    /// Use the creative (lexicon) prompt instead of the keyword-driven one.
    #[serde(default)]
    pub creative: bool,
}

/// Same fields as the POST body, arriving as query parameters on the
/// streaming endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestStreamQuery {
    pub description: String,
    #[serde(default = "default_count")]
    pub count: u32,
    pub user_id: Option<String>,
    #[serde(default)]
    pub creative: bool,
}

fn default_count() -> u32 {
    10
}

impl SuggestDomainsRequest {
    pub fn into_request(self) -> Result<SuggestRequest, DomainError> {
        build_request(self.description, self.count, self.user_id, self.creative)
    }
}

impl SuggestStreamQuery {
    pub fn into_request(self) -> Result<SuggestRequest, DomainError> {
        build_request(self.description, self.count, self.user_id, self.creative)
    }
}

fn build_request(
    description: String,
    count: u32,
    user_id: Option<String>,
    creative: bool,
) -> Result<SuggestRequest, DomainError> {
    let description = description.trim().to_string();
    if description.is_empty() {
        return Err(DomainError::InvalidInput(
            "description must not be empty".to_string(),
        ));
    }
    if count > MAX_TARGET_COUNT {
        return Err(DomainError::InvalidInput(format!(
            "count must be at most {MAX_TARGET_COUNT}"
        )));
    }

    Ok(SuggestRequest {
        description,
        target_count: count,
        prompt_type: if creative {
            PromptType::Lexicon
        } else {
            PromptType::Legacy
        },
        user_id,
        preferences: None,
        similar_to: None,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct DomainSuggestionResponse {
    pub domain: String,
    pub tld: String,
    pub status: DomainStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DomainSuggestionResponse {
    pub fn from_entry(entry: &SuggestionEntry) -> Self {
        Self {
            domain: entry.domain.clone(),
            tld: entry.tld.clone(),
            status: entry.status,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<DomainSuggestionResponse>,
    pub total: usize,
}
