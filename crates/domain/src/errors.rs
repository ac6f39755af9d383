use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("No domains found")]
    NoDomainsFound,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Domain not found: {0}")]
    DomainNotFound(String),

    #[error("Authentication required")]
    AuthRequired,

    #[error("Queue unavailable: {0}")]
    QueueUnavailable(String),

    #[error("Queue protocol error: {0}")]
    QueueProtocol(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Stable machine-readable code surfaced in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::ServiceUnavailable(_) | DomainError::QueueUnavailable(_) => {
                "service_unavailable"
            }
            DomainError::Timeout(_) => "timeout",
            DomainError::RateLimited(_) => "rate_limited",
            DomainError::GenerationFailed(_) => "generation_failed",
            DomainError::NoDomainsFound => "no_domains_found",
            DomainError::InvalidInput(_) | DomainError::InvalidDomainName(_) => "invalid_input",
            DomainError::DomainNotFound(_) => "domain_not_found",
            DomainError::AuthRequired => "auth_required",
            DomainError::QueueProtocol(_)
            | DomainError::DatabaseError(_)
            | DomainError::Internal(_) => "internal_error",
        }
    }

    /// Whether the client may sensibly retry the same request.
    pub fn retry_allowed(&self) -> bool {
        matches!(
            self,
            DomainError::ServiceUnavailable(_)
                | DomainError::QueueUnavailable(_)
                | DomainError::Timeout(_)
                | DomainError::RateLimited(_)
                | DomainError::GenerationFailed(_)
                | DomainError::NoDomainsFound
        )
    }

    /// User-facing message, independent of the internal detail string.
    pub fn user_message(&self) -> &'static str {
        match self.code() {
            "service_unavailable" => {
                "Our domain generation service is temporarily unavailable. Please try again in a few moments."
            }
            "timeout" => "The request took too long to complete. Please try again.",
            "rate_limited" => {
                "You've made too many requests. Please wait a moment before trying again."
            }
            "generation_failed" => {
                "We couldn't generate domain suggestions right now. Please try again."
            }
            "no_domains_found" => {
                "No available domains were found for your description. Try a different description or get creative!"
            }
            "invalid_input" => {
                "The provided input is invalid. Please check your request and try again."
            }
            "domain_not_found" => "The specified domain was not found in our database.",
            "auth_required" => "You need to be logged in to perform this action.",
            _ => "Something went wrong on our end. Please try again later.",
        }
    }
}
