use super::{parse_var, ConfigError};

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Upper bound on generate-and-check passes per request.
    pub max_retries: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self { max_retries: 5 }
    }
}

impl OrchestratorConfig {
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            max_retries: parse_var(&lookup, "MAX_SUGGESTIONS_RETRIES", 5)?,
        })
    }
}
