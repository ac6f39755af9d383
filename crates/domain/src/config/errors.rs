use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for {0}: {1}")]
    Invalid(String, String),

    #[error("Configuration validation failed: {0}")]
    Validation(String),
}
