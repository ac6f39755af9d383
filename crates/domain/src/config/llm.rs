use super::{parse_var, ConfigError};

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub top_p: f64,
    pub max_completion_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "qwen/qwen3-32b".to_string(),
            temperature: 0.6,
            top_p: 0.95,
            max_completion_tokens: 4096,
        }
    }
}

impl LlmConfig {
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: lookup("GROQ_API_KEY").unwrap_or_default(),
            base_url: lookup("GROQ_BASE_URL")
                .unwrap_or_else(|| "https://api.groq.com/openai/v1".to_string()),
            model: lookup("GROQ_MODEL").unwrap_or_else(|| "qwen/qwen3-32b".to_string()),
            temperature: parse_var(&lookup, "GROQ_MODEL_TEMPERATURE", 0.6)?,
            top_p: parse_var(&lookup, "GROQ_MODEL_TOP_P", 0.95)?,
            max_completion_tokens: parse_var(&lookup, "GROQ_MODEL_MAX_COMPLETION_TOKENS", 4096)?,
        })
    }

    /// The serve path needs a key; the worker path does not.
    pub fn require_api_key(&self) -> Result<(), ConfigError> {
        if self.api_key.is_empty() {
            return Err(ConfigError::Missing("GROQ_API_KEY".to_string()));
        }
        Ok(())
    }
}
