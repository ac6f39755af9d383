use async_trait::async_trait;
use namesmith_application::ports::{
    GeneratedBatch, GenerationRequest, SuggestionGenerator, TokenUsage,
};
use namesmith_domain::config::LlmConfig;
use namesmith_domain::{prompt, DomainError};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const MAX_ATTEMPTS: usize = 3;
const RETRY_DELAYS: [Duration; 3] = [
    Duration::from_millis(500),
    Duration::from_millis(1000),
    Duration::from_millis(2000),
];
/// Ask for more names than the caller needs so one generation round
/// usually survives the availability filter.
const OVER_REQUEST_MARGIN: u32 = 10;

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

#[derive(Debug, Deserialize, Default)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
    #[serde(default)]
    total_tokens: u64,
}

/// Chat-completion client for the Groq OpenAI-compatible endpoint.
///
/// Transient trouble (connect, timeout, 5xx, 429) is retried with backoff;
/// other 4xx responses and unparseable bodies are not.
pub struct GroqSuggestor {
    client: reqwest::Client,
    config: LlmConfig,
}

impl GroqSuggestor {
    pub fn new(config: LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_default();
        Self { client, config }
    }

    #[instrument(skip(self, request), fields(prompt = request.prompt_type.id()))]
    async fn request_once(&self, request: &GenerationRequest) -> Result<GeneratedBatch, Attempt> {
        let rendered = prompt::render(
            request.prompt_type,
            &request.description,
            request.target_count + OVER_REQUEST_MARGIN,
            request.preferences.as_ref(),
            request.similar_to.as_ref(),
        )
        .map_err(Attempt::fatal)?;

        let body = json!({
            "model": self.config.model,
            "messages": [{ "role": "user", "content": rendered }],
            "temperature": self.config.temperature,
            "top_p": self.config.top_p,
            "max_completion_tokens": self.config.max_completion_tokens,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Attempt::retryable(map_transport_err(e)))?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(Attempt::retryable(DomainError::RateLimited(
                "completion endpoint rate limited".to_string(),
            )));
        }
        if status.is_client_error() {
            // Client errors other than 429 do not improve on retry.
            let detail = response.text().await.unwrap_or_default();
            return Err(Attempt::fatal(DomainError::GenerationFailed(format!(
                "completion endpoint returned {status}: {detail}"
            ))));
        }
        if !status.is_success() {
            return Err(Attempt::retryable(DomainError::ServiceUnavailable(
                format!("completion endpoint returned {status}"),
            )));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            Attempt::retryable(DomainError::GenerationFailed(format!(
                "bad completion body: {e}"
            )))
        })?;

        let content = parsed
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| {
                Attempt::retryable(DomainError::GenerationFailed(
                    "completion had no choices".to_string(),
                ))
            })?;

        let domains = parse_suggestions(&content).map_err(Attempt::retryable)?;
        let usage = parsed
            .usage
            .map(|u| TokenUsage {
                total: u.total_tokens,
                prompt: u.prompt_tokens,
                completion: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(GeneratedBatch { domains, usage })
    }
}

/// Outcome of one request attempt; fatal errors skip remaining retries.
struct Attempt {
    error: DomainError,
    retryable: bool,
}

impl Attempt {
    fn retryable(error: DomainError) -> Self {
        Self {
            error,
            retryable: true,
        }
    }

    fn fatal(error: DomainError) -> Self {
        Self {
            error,
            retryable: false,
        }
    }
}

#[async_trait]
impl SuggestionGenerator for GroqSuggestor {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedBatch, DomainError> {
        let mut last_error = DomainError::GenerationFailed(
            "unable to generate domain suggestions".to_string(),
        );

        for attempt in 0..MAX_ATTEMPTS {
            match self.request_once(request).await {
                Ok(batch) if !batch.domains.is_empty() => return Ok(batch),
                Ok(_) => {
                    debug!(attempt = attempt + 1, "Empty generation, retrying");
                    last_error = DomainError::GenerationFailed(
                        "model returned no suggestions".to_string(),
                    );
                }
                Err(Attempt {
                    error,
                    retryable: false,
                }) => return Err(error),
                Err(Attempt { error, .. }) => {
                    warn!(attempt = attempt + 1, error = %error, "Generation attempt failed");
                    last_error = error;
                }
            }

            if attempt + 1 < MAX_ATTEMPTS {
                let mut delay = RETRY_DELAYS[attempt];
                if matches!(last_error, DomainError::RateLimited(_)) {
                    delay *= 2;
                }
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

fn map_transport_err(e: reqwest::Error) -> DomainError {
    if e.is_timeout() {
        DomainError::ServiceUnavailable("completion request timed out".to_string())
    } else if e.is_connect() {
        DomainError::ServiceUnavailable(format!("unable to reach completion endpoint: {e}"))
    } else {
        DomainError::ServiceUnavailable(e.to_string())
    }
}

/// Parse model output into candidate names: an optional code fence around a
/// JSON array of strings, or a bare string as a last resort.
fn parse_suggestions(content: &str) -> Result<Vec<String>, DomainError> {
    let body = strip_code_fence(content);

    let raw: Vec<String> = if body.starts_with('[') {
        serde_json::from_str(body).map_err(|e| {
            DomainError::GenerationFailed(format!("model did not return a JSON array: {e}"))
        })?
    } else {
        vec![body.to_string()]
    };

    let mut seen = HashSet::new();
    let mut sanitized = Vec::with_capacity(raw.len());
    for name in raw {
        let name = name.trim().to_lowercase().replace(' ', "");
        if name.is_empty() {
            continue;
        }
        if seen.insert(name.clone()) {
            sanitized.push(name);
        }
    }

    Ok(sanitized)
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .trim()
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}
