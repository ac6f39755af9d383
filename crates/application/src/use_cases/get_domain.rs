use crate::ports::DomainRepository;
use namesmith_domain::{DomainError, DomainRecord};
use std::sync::Arc;

/// Look up the stored record for a single domain.
pub struct GetDomainUseCase {
    domains: Arc<dyn DomainRepository>,
}

impl GetDomainUseCase {
    pub fn new(domains: Arc<dyn DomainRepository>) -> Self {
        Self { domains }
    }

    pub async fn execute(&self, fqdn: &str) -> Result<DomainRecord, DomainError> {
        let fqdn = fqdn.trim().to_lowercase();
        self.domains
            .get(&fqdn)
            .await?
            .ok_or(DomainError::DomainNotFound(fqdn))
    }
}
