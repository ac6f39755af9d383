use super::{parse_var, ConfigError};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            host: lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_var(&lookup, "API_PORT", 8000)?,
        })
    }
}
