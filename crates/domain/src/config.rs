mod database;
mod errors;
mod llm;
mod logging;
mod orchestrator;
mod queue;
mod server;
mod worker;

pub use database::DatabaseConfig;
pub use errors::ConfigError;
pub use llm::LlmConfig;
pub use logging::LoggingConfig;
pub use orchestrator::OrchestratorConfig;
pub use queue::QueueConfig;
pub use server::ServerConfig;
pub use worker::WorkerConfig;

/// Process-wide configuration, assembled once at startup and passed
/// explicitly through handlers and the worker entry point.
///
/// The environment variable names are the authoritative contract; every
/// field has a default so a bare environment still boots (except the LLM
/// API key, which `LlmConfig::require_api_key` enforces on the serve path).
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub queue: QueueConfig,
    pub llm: LlmConfig,
    pub orchestrator: OrchestratorConfig,
    pub worker: WorkerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Tests feed a map here instead of
    /// mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            server: ServerConfig::from_lookup(&lookup)?,
            queue: QueueConfig::from_lookup(&lookup)?,
            llm: LlmConfig::from_lookup(&lookup)?,
            orchestrator: OrchestratorConfig::from_lookup(&lookup)?,
            worker: WorkerConfig::from_lookup(&lookup)?,
            database: DatabaseConfig::from_lookup(&lookup)?,
            logging: LoggingConfig::from_lookup(&lookup)?,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "API port cannot be 0".to_string(),
            ));
        }
        if self.queue.job_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "RQ_JOB_TIMEOUT_SECONDS must be positive".to_string(),
            ));
        }
        if self.worker.max_concurrent_checks == 0 {
            return Err(ConfigError::Validation(
                "WORKER_MAX_CONCURRENT_CHECKS must be positive".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::Validation(format!(
                "GROQ_MODEL_TEMPERATURE out of range: {}",
                self.llm.temperature
            )));
        }
        Ok(())
    }
}

pub(crate) fn parse_var<T>(
    lookup: impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid(name.to_string(), raw)),
        None => Ok(default),
    }
}

pub(crate) fn parse_bool(
    lookup: impl Fn(&str) -> Option<String>,
    name: &str,
    default: bool,
) -> Result<bool, ConfigError> {
    match lookup(name) {
        Some(raw) => match raw.to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(ConfigError::Invalid(name.to_string(), raw)),
        },
        None => Ok(default),
    }
}
