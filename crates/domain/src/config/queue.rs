use super::{parse_var, ConfigError};

#[derive(Debug, Clone)]
pub struct QueueConfig {
    pub redis_url: String,
    pub queue_name: String,
    /// How long the dispatcher waits for job results before synthesizing
    /// non-conclusive statuses.
    pub job_timeout_secs: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://localhost:6379/0".to_string(),
            queue_name: "domain_checks".to_string(),
            job_timeout_secs: 30,
        }
    }
}

impl QueueConfig {
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            redis_url: lookup("REDIS_URL")
                .unwrap_or_else(|| "redis://localhost:6379/0".to_string()),
            queue_name: lookup("RQ_QUEUE").unwrap_or_else(|| "domain_checks".to_string()),
            job_timeout_secs: parse_var(&lookup, "RQ_JOB_TIMEOUT_SECONDS", 30)?,
        })
    }
}
