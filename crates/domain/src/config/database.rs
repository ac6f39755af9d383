use super::ConfigError;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "namesmith.db".to_string(),
        }
    }
}

impl DatabaseConfig {
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            path: lookup("DATABASE_PATH").unwrap_or_else(|| "namesmith.db".to_string()),
        })
    }
}
